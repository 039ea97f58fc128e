//! Log classification and diagnostic accumulation for logscan.
//!
//! Everything here is synchronous and free of IO:
//! - [`classify`] tags a single line
//! - [`IssueDetector`] decides whether a NOTE line reports a real problem
//! - [`Accumulator`] folds tagged lines into diagnostics
//! - [`ScanSession`] drives the accumulator line by line, counts problems and
//!   enforces the problem cap

pub mod accumulator;
pub mod classify;
pub mod issue;
pub mod session;
pub mod sink;

pub use accumulator::{Accumulator, Step};
pub use classify::{ClassifiedLine, classify};
pub use issue::{DEFAULT_ISSUE_PATTERNS, InvalidIssuePattern, IssueDetector, IssuePattern};
pub use session::{DEFAULT_PROBLEM_CAP, LineOutcome, ScanReport, ScanSession, scan_lines};
pub use sink::{DiagnosticSink, NullSink};
