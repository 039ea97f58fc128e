use crate::{DiagnosticSeverity, LogDiagnostic, SourceId};

/// Immutable snapshot of all diagnostics, suitable for host rendering.
///
/// Counts are computed from `sources` rather than cached alongside it.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsSnapshot {
    /// Per-source diagnostics, sorted with error-containing sources first.
    sources: Vec<(SourceId, Vec<LogDiagnostic>)>,
}

impl DiagnosticsSnapshot {
    #[must_use]
    pub fn new(sources: Vec<(SourceId, Vec<LogDiagnostic>)>) -> Self {
        Self { sources }
    }

    #[must_use]
    pub fn sources(&self) -> &[(SourceId, Vec<LogDiagnostic>)] {
        &self.sources
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    fn count_by_severity(&self, severity: DiagnosticSeverity) -> usize {
        self.sources
            .iter()
            .flat_map(|(_, items)| items)
            .filter(|d| d.severity() == severity)
            .count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count_by_severity(DiagnosticSeverity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count_by_severity(DiagnosticSeverity::Warning)
    }

    #[must_use]
    pub fn info_count(&self) -> usize {
        self.count_by_severity(DiagnosticSeverity::Information)
    }

    #[must_use]
    pub fn hint_count(&self) -> usize {
        self.count_by_severity(DiagnosticSeverity::Hint)
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.sources.iter().map(|(_, items)| items.len()).sum()
    }
}
