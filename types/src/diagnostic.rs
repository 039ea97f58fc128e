use serde::Serialize;

use crate::SourceId;

/// Severity level for a diagnostic.
///
/// Numeric values follow the editor convention (1=Error .. 4=Hint) so hosts can
/// forward them unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error = 1,
    Warning = 2,
    Information = 3,
    Hint = 4,
}

impl DiagnosticSeverity {
    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "info",
            Self::Hint => "hint",
        }
    }
}

/// A single diagnostic extracted from a log.
///
/// Fields are private; a diagnostic is immutable once flushed. Lines are
/// 0-indexed, the range always starts at column 0 and ends at `end_column`
/// (a character count) on `end_line`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogDiagnostic {
    severity: DiagnosticSeverity,
    message: String,
    start_line: u32,
    end_line: u32,
    end_column: u32,
}

impl LogDiagnostic {
    /// Construct a diagnostic. An `end_line` before `start_line` is clamped so the
    /// range is never inverted.
    #[must_use]
    pub fn new(
        severity: DiagnosticSeverity,
        message: String,
        start_line: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Self {
            severity,
            message,
            start_line,
            end_line: end_line.max(start_line),
            end_column,
        }
    }

    #[must_use]
    pub fn severity(&self) -> DiagnosticSeverity {
        self.severity
    }

    /// Message segments joined by `\n`.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn start_line(&self) -> u32 {
        self.start_line
    }

    /// Always 0: diagnostics cover whole lines.
    #[must_use]
    pub fn start_column(&self) -> u32 {
        0
    }

    #[must_use]
    pub fn end_line(&self) -> u32 {
        self.end_line
    }

    #[must_use]
    pub fn end_column(&self) -> u32 {
        self.end_column
    }

    /// Format as `source:line:col: severity: message` (1-indexed for display).
    ///
    /// Only the first message segment is shown; continuation segments are
    /// indented on the following lines.
    #[must_use]
    pub fn display_with_source(&self, source: &SourceId) -> String {
        let mut segments = self.message.split('\n');
        let head = segments.next().unwrap_or_default();
        let mut out = format!(
            "{}:{}:{}: {}: {}",
            source,
            self.start_line + 1,
            self.start_column() + 1,
            self.severity.label(),
            head,
        );
        for segment in segments {
            out.push_str("\n    ");
            out.push_str(segment);
        }
        out
    }
}
