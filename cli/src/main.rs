//! logscan CLI - scan log files and print their diagnostics.
//!
//! ```text
//! main() -> load config -> ScanSettings -> ScanManager::spawn() per file
//!                                                |
//!                                                v
//!                              diagnostics + summary per file (text or JSON)
//! ```
//!
//! Files are scanned concurrently; output is printed in argument order.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use logscan_config::{LogscanConfig, ScanConfig};
use logscan_engine::{
    DiagnosticsSnapshot, LogSource, ScanError, ScanManager, ScanReport, ScanSettings, ScanStatus,
    SourceId,
};

/// Scan SAS-style logs for errors, warnings and problem notes.
#[derive(Parser, Debug)]
#[command(name = "logscan", version, about)]
struct Cli {
    /// Stop a file's scan after this many problems.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    cap: Option<u32>,

    /// Path to a config file (default: ~/.logscan/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Log files to scan.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn load_settings(cli: &Cli) -> Result<ScanSettings> {
    let config = match &cli.config {
        Some(path) => Some(LogscanConfig::load_from(path)?),
        None => LogscanConfig::load()?,
    };
    let scan = config
        .as_ref()
        .map_or_else(ScanConfig::default, LogscanConfig::scan_or_default);

    let settings = ScanSettings::from_config(&scan).context("invalid [scan] configuration")?;
    Ok(match cli.cap {
        Some(cap) => settings.with_cap(cap),
        None => settings,
    })
}

/// One source per distinct path, in argument order. A repeated path would
/// supersede its own earlier scan.
fn unique_sources(files: &[PathBuf]) -> Vec<LogSource> {
    let mut seen = HashSet::new();
    files
        .iter()
        .map(LogSource::file)
        .filter(|source| {
            let fresh = seen.insert(source.id().clone());
            if !fresh {
                tracing::debug!(source = %source.id(), "Skipping duplicate path");
            }
            fresh
        })
        .collect()
}

fn final_status(result: &Result<ScanReport, ScanError>) -> ScanStatus {
    match result {
        Ok(report) => ScanStatus::Finished(report.summary),
        Err(e) => ScanStatus::Failed(e.to_string()),
    }
}

fn render_text(id: &SourceId, result: &Result<ScanReport, ScanError>, status: &ScanStatus) -> String {
    let mut out = String::new();
    if let Ok(report) = result {
        for diag in &report.diagnostics {
            out.push_str(&diag.display_with_source(id));
            out.push('\n');
        }
    }
    out.push_str(&format!("{id}: {}\n", status.label()));
    out
}

fn render_totals(snapshot: &DiagnosticsSnapshot) -> String {
    format!(
        "total: {} diagnostics in {} files ({} errors, {} warnings, {} info, {} hints)\n",
        snapshot.total_count(),
        snapshot.sources().len(),
        snapshot.error_count(),
        snapshot.warning_count(),
        snapshot.info_count(),
        snapshot.hint_count(),
    )
}

fn render_json(id: &SourceId, result: &Result<ScanReport, ScanError>) -> serde_json::Value {
    match result {
        Ok(report) => json!({
            "source": id,
            "summary": report.summary,
            "diagnostics": report.diagnostics,
        }),
        Err(e) => json!({
            "source": id,
            "error": e.to_string(),
        }),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    let manager = ScanManager::new(settings);
    tracing::debug!(
        files = cli.files.len(),
        cap = manager.settings().cap(),
        "Starting scans"
    );

    let handles: Vec<_> = unique_sources(&cli.files)
        .into_iter()
        .map(|source| (source.id().clone(), manager.spawn(source)))
        .collect();
    let file_count = handles.len();

    let mut failed = false;
    let mut json_results = Vec::new();
    let mut stdout = io::stdout().lock();

    for (id, handle) in handles {
        let result = handle.await.context("scan task panicked")?;
        if let Err(e) = &result {
            failed = true;
            eprintln!("error: {e}");
        }

        if cli.json {
            json_results.push(render_json(&id, &result));
        } else {
            let status = manager
                .status(&id)
                .unwrap_or_else(|| final_status(&result));
            stdout.write_all(render_text(&id, &result, &status).as_bytes())?;
        }
    }

    if cli.json {
        serde_json::to_writer_pretty(&mut stdout, &json_results)?;
        writeln!(stdout)?;
    } else if file_count > 1 {
        stdout.write_all(render_totals(&manager.snapshot()).as_bytes())?;
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use logscan_engine::{
        DiagnosticSeverity, LogDiagnostic, ScanCounters, ScanEnd, ScanSummary,
    };

    fn report(diagnostics: Vec<LogDiagnostic>, end: ScanEnd) -> ScanReport {
        ScanReport {
            summary: ScanSummary::new(ScanCounters::default(), end),
            diagnostics,
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from(["logscan", "--cap", "10", "--json", "a.log", "b.log"]).unwrap();
        assert_eq!(cli.cap, Some(10));
        assert!(cli.json);
        assert_eq!(cli.files.len(), 2);

        assert!(Cli::try_parse_from(["logscan", "--cap", "0", "a.log"]).is_err());
        assert!(Cli::try_parse_from(["logscan"]).is_err());
    }

    #[test]
    fn test_render_text() {
        let id = SourceId::new("job.log").unwrap();
        let result = Ok(report(
            vec![LogDiagnostic::new(
                DiagnosticSeverity::Error,
                "bad thing\nmore detail".to_string(),
                0,
                1,
                13,
            )],
            ScanEnd::Completed,
        ));
        let out = render_text(&id, &result, &final_status(&result));
        assert_eq!(
            out,
            "job.log:1:1: error: bad thing\n    more detail\njob.log: E:0 W:0 I:0\n"
        );
    }

    #[test]
    fn test_render_text_failure() {
        let id = SourceId::new("gone.log").unwrap();
        let result = Err(ScanError::Open {
            source_id: id.clone(),
            error: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        });
        let out = render_text(&id, &result, &final_status(&result));
        assert_eq!(
            out,
            "gone.log: Scan failed: failed to open gone.log: no such file\n"
        );
    }

    #[test]
    fn test_duplicate_paths_scanned_once() {
        let files = [
            PathBuf::from("a.log"),
            PathBuf::from("b.log"),
            PathBuf::from("a.log"),
        ];
        let ids: Vec<String> = unique_sources(&files)
            .iter()
            .map(|s| s.id().to_string())
            .collect();
        assert_eq!(ids, vec!["a.log", "b.log"]);
    }

    #[tokio::test]
    async fn test_duplicate_paths_are_not_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.log");
        std::fs::write(&path, "ERROR: x\n").unwrap();

        let manager = ScanManager::new(ScanSettings::default());
        let handles: Vec<_> = unique_sources(&[path.clone(), path])
            .into_iter()
            .map(|source| manager.spawn(source))
            .collect();
        assert_eq!(handles.len(), 1);
        for handle in handles {
            let report = handle.await.unwrap().unwrap();
            assert!(!report.summary.cancelled());
        }
    }

    #[test]
    fn test_render_totals() {
        let a = SourceId::new("a.log").unwrap();
        let snapshot = DiagnosticsSnapshot::new(vec![(
            a,
            vec![
                LogDiagnostic::new(DiagnosticSeverity::Error, "e".to_string(), 0, 0, 0),
                LogDiagnostic::new(DiagnosticSeverity::Hint, "h".to_string(), 1, 1, 0),
            ],
        )]);
        assert_eq!(
            render_totals(&snapshot),
            "total: 2 diagnostics in 1 files (1 errors, 0 warnings, 0 info, 1 hints)\n"
        );
    }

    #[test]
    fn test_render_json_error() {
        let id = SourceId::new("gone.log").unwrap();
        let result = Err(ScanError::Open {
            source_id: id.clone(),
            error: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        });
        let value = render_json(&id, &result);
        assert_eq!(value["source"], "gone.log");
        assert!(value["error"].as_str().unwrap().contains("no such file"));
    }

    #[test]
    fn test_render_json_report() {
        let id = SourceId::new("job.log").unwrap();
        let value = render_json(&id, &Ok(report(Vec::new(), ScanEnd::Capped)));
        assert_eq!(value["diagnostics"].as_array().map(Vec::len), Some(0));
        assert!(value["summary"].is_object());
    }
}
