//! Structural properties that hold for any log.

use logscan_engine::DiagnosticSeverity;

use crate::common::scan_text;

const MIXED_LOG: &str = "\
NOTE: Copyright (c) 2016 by SAS Institute Inc., Cary, NC, USA.
   continuation of a hint
plain text
ERROR 180-322: Statement is not valid or it is used out of proper order.
   second error line
   third error line
WARNING: Apparent symbolic reference X not resolved.
NOTE: Variable AGE is uninitialized.
NOTE: DATA statement used (Total process time):
      real time           0.01 seconds
INFO: Character variables have defaulted to a length of 200.
  orphan is fine here because the hint above is open
ERROR: Variable Y not found.

   this orphan follows a blank line
NOTE: Missing values were generated as a result of performing an operation on missing values.
";

#[tokio::test]
async fn error_count_matches_error_lines() {
    let report = scan_text(MIXED_LOG).await;
    let error_lines = MIXED_LOG
        .lines()
        .filter(|l| l.starts_with("ERROR"))
        .count();
    let error_diags = report
        .diagnostics
        .iter()
        .filter(|d| d.severity() == DiagnosticSeverity::Error)
        .count();
    assert_eq!(error_diags, error_lines);
    assert_eq!(report.summary.counters().errors() as usize, error_lines);
}

#[tokio::test]
async fn lines_are_ordered_and_ranges_valid() {
    let report = scan_text(MIXED_LOG).await;
    for diag in &report.diagnostics {
        assert!(diag.end_line() >= diag.start_line());
    }
    for pair in report.diagnostics.windows(2) {
        assert!(pair[0].start_line() < pair[1].start_line());
        assert!(pair[0].end_line() < pair[1].start_line());
    }
}

#[tokio::test]
async fn continuations_fold_and_orphans_drop() {
    let report = scan_text(MIXED_LOG).await;
    let first_error = report
        .diagnostics
        .iter()
        .find(|d| d.severity() == DiagnosticSeverity::Error)
        .unwrap();
    assert_eq!(
        first_error.message(),
        "Statement is not valid or it is used out of proper order.\nsecond error line\nthird error line"
    );
    assert!(
        report
            .diagnostics
            .iter()
            .all(|d| !d.message().contains("this orphan"))
    );
}

#[tokio::test]
async fn notes_split_into_issues_and_hints() {
    let report = scan_text(MIXED_LOG).await;
    let counters = report.summary.counters();
    assert_eq!(counters.issue_notes(), 2);

    let infos = report
        .diagnostics
        .iter()
        .filter(|d| d.severity() == DiagnosticSeverity::Information)
        .count();
    assert_eq!(infos, 2);
    assert_eq!(counters.problems(), counters.errors() + counters.warnings() + 2);
}

#[tokio::test]
async fn rescanning_is_deterministic() {
    let first = scan_text(MIXED_LOG).await;
    let second = scan_text(MIXED_LOG).await;
    assert_eq!(first, second);
}
