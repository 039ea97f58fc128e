//! Shared helpers for engine integration tests.

use std::path::PathBuf;

use logscan_engine::{LogSource, ScanManager, ScanReport, ScanSettings};
use tempfile::TempDir;

/// Write `contents` to `name` inside a fresh temp dir.
///
/// The dir must outlive the scan, so it is returned alongside the path.
pub fn write_log(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write log");
    (dir, path)
}

pub async fn scan_text(contents: &str) -> ScanReport {
    scan_text_with(contents, ScanSettings::default()).await
}

pub async fn scan_text_with(contents: &str, settings: ScanSettings) -> ScanReport {
    let (_dir, path) = write_log("job.log", contents);
    ScanManager::new(settings)
        .scan(LogSource::file(path))
        .await
        .expect("scan succeeds")
}
