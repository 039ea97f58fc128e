//! Scan counters, summaries and status.

use std::fmt;

use serde::Serialize;

/// A diagnostic kind that counts toward the problem cap.
///
/// Hints and informational NOTE lines are never problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    Error,
    Warning,
    IssueNote,
}

/// Per-scan problem counters. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanCounters {
    errors: u32,
    warnings: u32,
    issue_notes: u32,
}

impl ScanCounters {
    pub fn record(&mut self, kind: ProblemKind) {
        let slot = match kind {
            ProblemKind::Error => &mut self.errors,
            ProblemKind::Warning => &mut self.warnings,
            ProblemKind::IssueNote => &mut self.issue_notes,
        };
        *slot = slot.saturating_add(1);
    }

    #[must_use]
    pub fn errors(&self) -> u32 {
        self.errors
    }

    #[must_use]
    pub fn warnings(&self) -> u32 {
        self.warnings
    }

    #[must_use]
    pub fn issue_notes(&self) -> u32 {
        self.issue_notes
    }

    /// Total counted problems: errors + warnings + issue notes.
    #[must_use]
    pub fn problems(&self) -> u32 {
        self.errors
            .saturating_add(self.warnings)
            .saturating_add(self.issue_notes)
    }
}

impl fmt::Display for ScanCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "E:{} W:{} I:{}",
            self.errors, self.warnings, self.issue_notes
        )
    }
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanEnd {
    /// The stream was read to the end.
    Completed,
    /// The problem cap was reached and the remaining lines were skipped.
    Capped,
    /// The scan was superseded or cleared before the stream ended.
    Cancelled,
}

/// Terminal summary of one scan, suitable for a status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    #[serde(flatten)]
    counters: ScanCounters,
    end: ScanEnd,
}

impl ScanSummary {
    #[must_use]
    pub fn new(counters: ScanCounters, end: ScanEnd) -> Self {
        Self { counters, end }
    }

    #[must_use]
    pub fn counters(&self) -> ScanCounters {
        self.counters
    }

    #[must_use]
    pub fn end(&self) -> ScanEnd {
        self.end
    }

    #[must_use]
    pub fn capped_early(&self) -> bool {
        self.end == ScanEnd::Capped
    }

    #[must_use]
    pub fn cancelled(&self) -> bool {
        self.end == ScanEnd::Cancelled
    }

    /// Compact status like `"E:1 W:2 I:0"`, suffixed when the scan stopped early.
    #[must_use]
    pub fn status_string(&self) -> String {
        let base = self.counters.to_string();
        match self.end {
            ScanEnd::Completed => base,
            ScanEnd::Capped => format!("{base} (stopped after {} problems)", self.counters.problems()),
            ScanEnd::Cancelled => format!("{base} (cancelled)"),
        }
    }
}

/// Per-source scan state exposed to hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    Scanning,
    Finished(ScanSummary),
    Failed(String),
}

impl ScanStatus {
    /// Text for a status indicator.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Scanning => "Log scanning..".to_string(),
            Self::Finished(summary) => summary.status_string(),
            Self::Failed(message) => format!("Scan failed: {message}"),
        }
    }
}
