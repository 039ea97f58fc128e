//! Async scan driver: pulls lines from a reader into a [`ScanSession`].
//!
//! Reading the next line is the only suspension point. The read loop runs
//! inside an [`Abortable`], and the abort flag is also checked between lines,
//! so a line is always fully processed (including its publish) before the
//! scan can stop.

use futures_util::future::{AbortHandle, AbortRegistration, Abortable};
use logscan_core::{DiagnosticSink, LineOutcome, ScanReport, ScanSession};
use logscan_types::SourceId;
use tokio::io::AsyncBufRead;

use crate::error::ScanError;
use crate::reader::LineReader;
use crate::settings::ScanSettings;
use crate::source::LogSource;

enum LoopEnd {
    /// End of stream or problem cap.
    Done,
    Aborted,
}

async fn read_lines<R, S>(
    session: &mut ScanSession<'_, S>,
    reader: &mut LineReader<R>,
    abort: &AbortHandle,
) -> Result<LoopEnd, ScanError>
where
    R: AsyncBufRead + Unpin,
    S: DiagnosticSink,
{
    loop {
        if abort.is_aborted() {
            return Ok(LoopEnd::Aborted);
        }
        let line = reader.next_line().await.map_err(|error| ScanError::Read {
            source_id: session.source().clone(),
            lines: session.lines_seen(),
            counters: session.counters(),
            error,
        })?;
        let Some(line) = line else {
            return Ok(LoopEnd::Done);
        };
        if session.push_line(&line) == LineOutcome::Capped {
            return Ok(LoopEnd::Done);
        }
    }
}

/// Scan every line of `reader` under `settings`, publishing to `sink`.
///
/// Aborting the handle paired with `registration` stops the scan at the next
/// line boundary with a `Cancelled` report.
pub async fn scan_reader<R, S>(
    source_id: SourceId,
    reader: &mut LineReader<R>,
    settings: &ScanSettings,
    sink: S,
    registration: AbortRegistration,
) -> Result<ScanReport, ScanError>
where
    R: AsyncBufRead + Unpin,
    S: DiagnosticSink,
{
    let abort = registration.handle();
    let mut session = ScanSession::new(source_id, settings.cap(), settings.detector(), sink);

    let outcome = Abortable::new(read_lines(&mut session, reader, &abort), registration).await;
    match outcome {
        Ok(Ok(LoopEnd::Done)) => Ok(session.finish()),
        Ok(Ok(LoopEnd::Aborted)) | Err(_) => Ok(session.cancel()),
        Ok(Err(e)) => Err(e),
    }
}

/// Open `source` and scan it to the end, the cap, or an abort.
pub async fn scan_source<S: DiagnosticSink>(
    source: &LogSource,
    settings: &ScanSettings,
    sink: S,
    registration: AbortRegistration,
) -> Result<ScanReport, ScanError> {
    let id = source.id().clone();
    tracing::info!(source = %id, "Log scan started");

    let mut reader = source
        .open(settings.large_file_bytes())
        .await
        .map_err(|error| ScanError::Open {
            source_id: id.clone(),
            error,
        })
        .inspect_err(|e| tracing::warn!(source = %id, "{e}"))?;

    let report = scan_reader(id.clone(), &mut reader, settings, sink, registration)
        .await
        .inspect_err(|e| tracing::warn!(source = %id, "{e}"))?;

    tracing::info!(
        source = %id,
        diagnostics = report.diagnostics.len(),
        status = %report.summary.status_string(),
        "Log scan finished"
    );
    Ok(report)
}
