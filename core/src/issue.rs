//! Issue detection for `NOTE:` lines.
//!
//! Most NOTE lines are routine ("The data set has 10 observations"), but some
//! report a real processing problem. The detector is an ordered list of
//! labelled patterns; a NOTE line matching any of them is an issue.

use regex::{Regex, RegexSet};
use thiserror::Error;

/// A labelled pattern. The label names the problem for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuePattern {
    pub label: &'static str,
    pub pattern: &'static str,
}

/// Curated patterns for problems reported through NOTE lines, in match order.
pub const DEFAULT_ISSUE_PATTERNS: &[IssuePattern] = &[
    IssuePattern {
        label: "uninitialized-variable",
        pattern: r"Variable \w+ is uninitialized\.",
    },
    IssuePattern {
        label: "missing-values",
        pattern: r"Missing values were generated",
    },
    IssuePattern {
        label: "invalid",
        pattern: r"Invalid",
    },
    IssuePattern {
        label: "groups-not-created",
        pattern: r"Groups are not created",
    },
    IssuePattern {
        label: "merge-repeated-by-values",
        pattern: r"MERGE statement has more than one data set with repeats of BY values",
    },
    IssuePattern {
        label: "format-too-small",
        pattern: r"W\.D format was too small",
    },
    IssuePattern {
        label: "obs-zero",
        pattern: r"SAS set option OBS=0",
    },
    IssuePattern {
        label: "step-stopped",
        pattern: r"The SAS System stopped processing this step because of errors",
    },
    IssuePattern {
        label: "log-axis",
        pattern: r"The log axis cannot support zero or negative values",
    },
    IssuePattern {
        label: "identifier-after-quoted-string",
        pattern: r"The meaning of an identifier after a quoted string\b",
    },
    IssuePattern {
        label: "implicit-conversion",
        pattern: r"\w+ values have been converted",
    },
    IssuePattern {
        label: "not-found",
        pattern: r" \w+ was not found or could not be loaded\.",
    },
    IssuePattern {
        label: "macro-compile-errors",
        pattern: r"The macro \w+ completed compilation with errors\.",
    },
];

#[derive(Debug, Error)]
#[error("invalid issue pattern '{label}': {source}")]
pub struct InvalidIssuePattern {
    pub label: String,
    #[source]
    pub source: regex::Error,
}

/// Ordered matcher set over NOTE lines.
#[derive(Debug, Clone)]
pub struct IssueDetector {
    labels: Vec<String>,
    set: RegexSet,
}

impl IssueDetector {
    /// Build from `(label, pattern)` pairs. Fails on the first invalid pattern.
    pub fn new<I, L, P>(patterns: I) -> Result<Self, InvalidIssuePattern>
    where
        I: IntoIterator<Item = (L, P)>,
        L: Into<String>,
        P: AsRef<str>,
    {
        let mut labels = Vec::new();
        let mut sources = Vec::new();
        for (label, pattern) in patterns {
            let label = label.into();
            if let Err(source) = Regex::new(pattern.as_ref()) {
                return Err(InvalidIssuePattern { label, source });
            }
            labels.push(label);
            sources.push(pattern.as_ref().to_string());
        }
        let set = RegexSet::new(&sources).map_err(|source| InvalidIssuePattern {
            label: "<set>".to_string(),
            source,
        })?;
        Ok(Self { labels, set })
    }

    /// Number of patterns in the detector.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn is_issue(&self, note_line: &str) -> bool {
        self.set.is_match(note_line)
    }

    /// Label of the first pattern (in list order) matching `note_line`.
    #[must_use]
    pub fn first_match(&self, note_line: &str) -> Option<&str> {
        self.set
            .matches(note_line)
            .iter()
            .next()
            .map(|index| self.labels[index].as_str())
    }
}

impl Default for IssueDetector {
    fn default() -> Self {
        Self::new(DEFAULT_ISSUE_PATTERNS.iter().map(|p| (p.label, p.pattern)))
            .expect("default issue patterns are valid")
    }
}
