//! Diagnostic sink — where a session publishes its flushed diagnostics.

use logscan_types::{LogDiagnostic, SourceId};

/// Receives the diagnostic set of a source as it grows.
///
/// Every call carries the *full* set flushed so far for `source`, in flush
/// order; each call's slice extends the previous one. Implementations replace
/// or merge, never append the whole slice again.
pub trait DiagnosticSink {
    fn publish(&mut self, source: &SourceId, diagnostics: &[LogDiagnostic]);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(&SourceId, &[LogDiagnostic]),
{
    fn publish(&mut self, source: &SourceId, diagnostics: &[LogDiagnostic]) {
        self(source, diagnostics);
    }
}

/// Sink that discards everything. Useful when only the returned report matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn publish(&mut self, _source: &SourceId, _diagnostics: &[LogDiagnostic]) {}
}
