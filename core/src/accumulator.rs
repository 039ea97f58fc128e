//! Diagnostic accumulation state machine.
//!
//! | Current | Line         | Action                                   | Next |
//! |---------|--------------|------------------------------------------|------|
//! | Idle    | start        | open a diagnostic at `n`                 | Open |
//! | Open    | start        | flush ending at `n - 1`, open at `n`     | Open |
//! | Open    | continuation | append `"\n" + content`                  | Open |
//! | Idle    | continuation | dropped                                  | Idle |
//! | Open    | plain        | flush ending at `n - 1`                  | Idle |
//! | Idle    | plain        | nothing                                  | Idle |
//! | any     | `finish()`   | flush ending at the last line seen       | Idle |
//!
//! A NOTE start opens a Hint unless the issue detector flags it, in which
//! case it opens an Information diagnostic and counts as a problem.

use logscan_types::{DiagnosticSeverity, LogDiagnostic, ProblemKind};

use crate::classify::ClassifiedLine;
use crate::issue::IssueDetector;

/// The diagnostic currently being built.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenDiagnostic {
    start_line: u32,
    severity: DiagnosticSeverity,
    message: String,
    /// Character length of the last line that contributed to the message.
    last_line_len: u32,
}

impl OpenDiagnostic {
    fn close(self, end_line: u32, fallback_len: u32) -> LogDiagnostic {
        let end_column = if self.last_line_len > 0 {
            self.last_line_len
        } else {
            fallback_len
        };
        LogDiagnostic::new(
            self.severity,
            self.message,
            self.start_line,
            end_line,
            end_column,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum AccumulatorState {
    #[default]
    Idle,
    Open(OpenDiagnostic),
}

/// Result of feeding one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    /// Diagnostic completed by this line, if any.
    pub flushed: Option<LogDiagnostic>,
    /// Problem opened by this line, if it counts toward the cap.
    pub counted: Option<ProblemKind>,
}

/// Folds classified lines into diagnostics. Holds at most one open diagnostic.
#[derive(Debug, Default)]
pub struct Accumulator {
    state: AccumulatorState,
    last_line: Option<u32>,
}

impl Accumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, AccumulatorState::Open(_))
    }

    /// Feed line `line_no` (0-indexed, strictly increasing across calls).
    ///
    /// `line_len` is the character length of the raw line.
    pub fn feed(
        &mut self,
        line_no: u32,
        line: ClassifiedLine<'_>,
        line_len: u32,
        detector: &IssueDetector,
    ) -> Step {
        debug_assert!(self.last_line.is_none_or(|last| last < line_no));
        self.last_line = Some(line_no);

        let (severity, message, counted) = match line {
            ClassifiedLine::StartError(rest) => {
                (DiagnosticSeverity::Error, rest, Some(ProblemKind::Error))
            }
            ClassifiedLine::StartWarning(rest) => {
                (DiagnosticSeverity::Warning, rest, Some(ProblemKind::Warning))
            }
            ClassifiedLine::StartNote(full) => {
                if let Some(label) = detector.first_match(full) {
                    tracing::trace!(line = line_no, issue = label, "NOTE flagged as issue");
                    (
                        DiagnosticSeverity::Information,
                        full,
                        Some(ProblemKind::IssueNote),
                    )
                } else {
                    (DiagnosticSeverity::Hint, full, None)
                }
            }
            ClassifiedLine::StartHint(rest) => (DiagnosticSeverity::Hint, rest, None),
            ClassifiedLine::Continuation(content) => {
                if let AccumulatorState::Open(open) = &mut self.state {
                    open.message.push('\n');
                    open.message.push_str(content);
                    open.last_line_len = line_len;
                }
                return Step::default();
            }
            ClassifiedLine::Plain => {
                return Step {
                    flushed: self.flush_before(line_no, line_len),
                    counted: None,
                };
            }
        };

        let flushed = self.flush_before(line_no, line_len);
        self.state = AccumulatorState::Open(OpenDiagnostic {
            start_line: line_no,
            severity,
            message: message.to_string(),
            last_line_len: line_len,
        });
        Step { flushed, counted }
    }

    /// Close the open diagnostic so that it ends on the line before `line_no`.
    ///
    /// `trigger_len` is the length of line `line_no`, used as the end column
    /// when the diagnostic has no recorded line length.
    pub fn flush_before(&mut self, line_no: u32, trigger_len: u32) -> Option<LogDiagnostic> {
        match std::mem::take(&mut self.state) {
            AccumulatorState::Idle => None,
            AccumulatorState::Open(open) => {
                let end_line = line_no.saturating_sub(1);
                Some(open.close(end_line, trigger_len))
            }
        }
    }

    /// End of stream: close the open diagnostic at the last line seen.
    pub fn finish(&mut self) -> Option<LogDiagnostic> {
        match std::mem::take(&mut self.state) {
            AccumulatorState::Idle => None,
            AccumulatorState::Open(open) => {
                let end_line = self.last_line.unwrap_or(open.start_line);
                Some(open.close(end_line, 0))
            }
        }
    }
}
