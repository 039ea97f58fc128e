//! Line classifier.
//!
//! Maps one log line to the role it plays in diagnostic accumulation. The
//! patterns overlap (a `NOTE:` line is also "not indented", an indented
//! `ERROR:` is a continuation), so they are tried in a fixed order and the
//! first match wins. Classification is total: anything unrecognized is
//! [`ClassifiedLine::Plain`].

use std::sync::OnceLock;

use regex::Regex;

/// The role of a single line, borrowing the captured fragment from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifiedLine<'a> {
    /// `ERROR:` or `ERROR <n>-<n>:`; carries the message remainder.
    StartError(&'a str),
    /// `WARNING:`; carries the message remainder.
    StartWarning(&'a str),
    /// `NOTE:`; carries the whole line, which is both the message and the
    /// input to the issue detector.
    StartNote(&'a str),
    /// `INFO:` or `Notice:`; carries the message remainder.
    StartHint(&'a str),
    /// Indented, non-blank line; carries the content without leading whitespace.
    Continuation(&'a str),
    Plain,
}

struct LinePatterns {
    error: Regex,
    warning: Regex,
    hint: Regex,
    continuation: Regex,
}

impl LinePatterns {
    fn new() -> Self {
        Self {
            error: Regex::new(r"^ERROR(?::|\s*\d+-\d+:?)\s*(.*)$").expect("valid error-start regex"),
            warning: Regex::new(r"^WARNING:\s*(.*)$").expect("valid warning-start regex"),
            hint: Regex::new(r"^(?:INFO|Notice):\s*(.*)$").expect("valid hint-start regex"),
            continuation: Regex::new(r"^\s+(\S.*)$").expect("valid continuation regex"),
        }
    }
}

static LINE_PATTERNS: OnceLock<LinePatterns> = OnceLock::new();

fn line_patterns() -> &'static LinePatterns {
    LINE_PATTERNS.get_or_init(LinePatterns::new)
}

fn capture<'a>(regex: &Regex, line: &'a str) -> Option<&'a str> {
    regex
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Classify one line (without its line terminator).
#[must_use]
pub fn classify(line: &str) -> ClassifiedLine<'_> {
    let patterns = line_patterns();

    if let Some(rest) = capture(&patterns.error, line) {
        return ClassifiedLine::StartError(rest);
    }
    if let Some(rest) = capture(&patterns.warning, line) {
        return ClassifiedLine::StartWarning(rest);
    }
    if line.starts_with("NOTE:") {
        return ClassifiedLine::StartNote(line);
    }
    if let Some(rest) = capture(&patterns.hint, line) {
        return ClassifiedLine::StartHint(rest);
    }
    if let Some(content) = capture(&patterns.continuation, line) {
        return ClassifiedLine::Continuation(content);
    }
    ClassifiedLine::Plain
}
