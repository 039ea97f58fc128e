//! Synchronous scan session.
//!
//! A session owns everything one scan needs: the accumulator, the counters,
//! the line cursor and the diagnostics flushed so far. Lines are pushed one at
//! a time; each push is fully processed (including any publish to the sink)
//! before it returns. The async stream driver in `logscan-engine` is a thin
//! loop around [`ScanSession::push_line`].

use logscan_types::{
    DiagnosticSeverity, LogDiagnostic, ScanCounters, ScanEnd, ScanSummary, SourceId,
};

use crate::accumulator::Accumulator;
use crate::classify::classify;
use crate::issue::IssueDetector;
use crate::sink::DiagnosticSink;

/// Default number of counted problems after which a scan stops.
pub const DEFAULT_PROBLEM_CAP: u32 = 499;

/// Whether the caller should keep feeding lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    /// The problem cap was reached; no further lines are consumed.
    Capped,
}

/// Summary plus the complete diagnostic set of a finished scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub summary: ScanSummary,
    pub diagnostics: Vec<LogDiagnostic>,
}

pub struct ScanSession<'d, S> {
    source: SourceId,
    cap: u32,
    detector: &'d IssueDetector,
    sink: S,
    accumulator: Accumulator,
    counters: ScanCounters,
    next_line: u32,
    diagnostics: Vec<LogDiagnostic>,
    capped: bool,
}

fn char_len(line: &str) -> u32 {
    u32::try_from(line.chars().count()).unwrap_or(u32::MAX)
}

impl<'d, S: DiagnosticSink> ScanSession<'d, S> {
    #[must_use]
    pub fn new(source: SourceId, cap: u32, detector: &'d IssueDetector, sink: S) -> Self {
        Self {
            source,
            cap,
            detector,
            sink,
            accumulator: Accumulator::new(),
            counters: ScanCounters::default(),
            next_line: 0,
            diagnostics: Vec::new(),
            capped: false,
        }
    }

    #[must_use]
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    #[must_use]
    pub fn counters(&self) -> ScanCounters {
        self.counters
    }

    /// Number of lines consumed so far.
    #[must_use]
    pub fn lines_seen(&self) -> u32 {
        self.next_line
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[LogDiagnostic] {
        &self.diagnostics
    }

    /// Process the next line (without its terminator).
    ///
    /// Once the problem count has reached the cap, the next pushed line is not
    /// classified: the open diagnostic is closed before it and a synthetic
    /// "scan stopped" diagnostic is placed on it.
    pub fn push_line(&mut self, line: &str) -> LineOutcome {
        if self.capped {
            return LineOutcome::Capped;
        }

        let line_no = self.next_line;
        let line_len = char_len(line);
        let problems = self.counters.problems();

        if problems >= self.cap {
            tracing::warn!(
                source = %self.source,
                file = self.source.basename(),
                problems,
                line = line_no,
                "Problem cap reached; scan will stop"
            );
            if let Some(diag) = self.accumulator.flush_before(line_no, line_len) {
                self.emit(diag);
            }
            self.emit(LogDiagnostic::new(
                DiagnosticSeverity::Information,
                format!("Scan stopped after finding {problems} problems."),
                line_no,
                line_no,
                line_len,
            ));
            self.capped = true;
            return LineOutcome::Capped;
        }

        let step = self
            .accumulator
            .feed(line_no, classify(line), line_len, self.detector);
        if let Some(kind) = step.counted {
            self.counters.record(kind);
        }
        if let Some(diag) = step.flushed {
            self.emit(diag);
        }
        self.next_line = self.next_line.saturating_add(1);
        LineOutcome::Continue
    }

    /// End of stream. Flushes the open diagnostic unless the scan was capped.
    pub fn finish(mut self) -> ScanReport {
        let end = if self.capped {
            ScanEnd::Capped
        } else {
            if let Some(diag) = self.accumulator.finish() {
                self.emit(diag);
            }
            ScanEnd::Completed
        };
        let summary = ScanSummary::new(self.counters, end);
        tracing::debug!(
            source = %self.source,
            lines = self.next_line,
            diagnostics = self.diagnostics.len(),
            status = %summary.status_string(),
            "Scan session finished"
        );
        ScanReport {
            summary,
            diagnostics: self.diagnostics,
        }
    }

    /// Abandon the scan. The open diagnostic is discarded and nothing more is
    /// published.
    #[must_use]
    pub fn cancel(self) -> ScanReport {
        ScanReport {
            summary: ScanSummary::new(self.counters, ScanEnd::Cancelled),
            diagnostics: self.diagnostics,
        }
    }

    fn emit(&mut self, diag: LogDiagnostic) {
        tracing::trace!(
            source = %self.source,
            start = diag.start_line(),
            end = diag.end_line(),
            severity = diag.severity().label(),
            "Diagnostic flushed"
        );
        self.diagnostics.push(diag);
        self.sink.publish(&self.source, &self.diagnostics);
    }
}

/// Scan an in-memory sequence of lines in one call.
pub fn scan_lines<I, L, S>(
    source: SourceId,
    lines: I,
    cap: u32,
    detector: &IssueDetector,
    sink: S,
) -> ScanReport
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
    S: DiagnosticSink,
{
    let mut session = ScanSession::new(source, cap, detector, sink);
    for line in lines {
        if session.push_line(line.as_ref()) == LineOutcome::Capped {
            break;
        }
    }
    session.finish()
}
