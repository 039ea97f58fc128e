//! End-to-end scans of log files on disk.

use logscan_engine::{
    AbortHandle, DiagnosticSeverity, LogSource, ScanError, ScanManager, ScanSettings, ScanStatus,
    SourceId, scan_source,
};

use crate::common::{scan_text, scan_text_with, write_log};

#[tokio::test]
async fn error_with_continuation_then_warning() {
    let report = scan_text("ERROR: bad thing\n  more detail\nWARNING: minor issue\n").await;

    assert_eq!(report.diagnostics.len(), 2);
    let error = &report.diagnostics[0];
    assert_eq!(error.severity(), DiagnosticSeverity::Error);
    assert_eq!((error.start_line(), error.end_line()), (0, 1));
    assert_eq!(error.message(), "bad thing\nmore detail");
    assert_eq!(error.start_column(), 0);
    assert_eq!(error.end_column(), "  more detail".len() as u32);

    let warning = &report.diagnostics[1];
    assert_eq!(warning.severity(), DiagnosticSeverity::Warning);
    assert_eq!((warning.start_line(), warning.end_line()), (2, 2));
    assert_eq!(warning.message(), "minor issue");
}

#[tokio::test]
async fn issue_note_is_information() {
    let report = scan_text("NOTE: Variable X is uninitialized.\nsome normal line\n").await;

    assert_eq!(report.diagnostics.len(), 1);
    let note = &report.diagnostics[0];
    assert_eq!(note.severity(), DiagnosticSeverity::Information);
    assert_eq!(note.start_line(), 0);
    assert_eq!(note.end_line(), 0);
    assert_eq!(report.summary.counters().issue_notes(), 1);
}

#[tokio::test]
async fn crlf_file_matches_lf_file() {
    let lf = scan_text("ERROR: a\n  b\nNOTE: fine\nplain\n").await;
    let crlf = scan_text("ERROR: a\r\n  b\r\nNOTE: fine\r\nplain\r\n").await;
    assert_eq!(lf, crlf);
}

#[tokio::test]
async fn cap_stops_large_error_log() {
    let contents: String = (0..600).map(|i| format!("ERROR: failure {i}\n")).collect();
    let report = scan_text(&contents).await;

    assert!(report.summary.capped_early());
    assert_eq!(report.summary.counters().errors(), 499);
    assert_eq!(report.diagnostics.len(), 500);
    let marker = report.diagnostics.last().unwrap();
    assert_eq!(marker.severity(), DiagnosticSeverity::Information);
    assert_eq!(marker.message(), "Scan stopped after finding 499 problems.");
    assert_eq!(marker.start_line(), 499);
    assert_eq!(marker.end_column(), "ERROR: failure 499".len() as u32);
    assert_eq!(
        report.summary.status_string(),
        "E:499 W:0 I:0 (stopped after 499 problems)"
    );
}

#[tokio::test]
async fn configured_cap_applies() {
    let report = scan_text_with(
        "WARNING: a\nWARNING: b\nWARNING: c\n",
        ScanSettings::default().with_cap(1),
    )
    .await;
    assert!(report.summary.capped_early());
    assert_eq!(report.diagnostics.len(), 2);
    assert_eq!(report.diagnostics[0].end_line(), 0);
    assert_eq!(report.diagnostics[1].start_line(), 1);
}

#[tokio::test]
async fn missing_file_fails_and_marks_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.log");
    let manager = ScanManager::new(ScanSettings::default());

    let err = manager.scan(LogSource::file(&path)).await.unwrap_err();
    assert!(matches!(err, ScanError::Open { .. }));
    assert_eq!(err.source_id(), &SourceId::from_path(&path));
    assert!(matches!(
        manager.status(err.source_id()),
        Some(ScanStatus::Failed(_))
    ));
}

#[tokio::test]
async fn scan_source_with_closure_sink() {
    let (_dir, path) = write_log("job.log", "ERROR: one\nplain\nERROR: two\n");
    let mut sizes = Vec::new();
    let report = scan_source(
        &LogSource::file(&path),
        &ScanSettings::default(),
        |_: &SourceId, diags: &[logscan_engine::LogDiagnostic]| sizes.push(diags.len()),
        AbortHandle::new_pair().1,
    )
    .await
    .unwrap();

    assert_eq!(report.diagnostics.len(), 2);
    assert_eq!(sizes, vec![1, 2]);
}

#[tokio::test]
async fn empty_file_completes_without_diagnostics() {
    let report = scan_text("").await;
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.summary.status_string(), "E:0 W:0 I:0");
}
