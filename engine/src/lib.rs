//! Async scanning engine for SAS-style logs.
//!
//! [`ScanManager`] is the host-facing API: it turns open/active/command
//! triggers into scans, streams each source line by line through the core
//! classifier, and keeps the per-source diagnostic sets current.

mod error;
mod manager;
mod reader;
mod scan;
mod settings;
mod source;
mod store;

pub use error::{ScanError, SettingsError};
pub use manager::{PreparedScan, ScanManager, ScanTrigger};
pub use reader::{LineReader, MAX_LINE_BYTES};
pub use scan::{scan_reader, scan_source};
pub use settings::ScanSettings;
pub use source::{BoxedLineReader, LogSource};

pub use futures_util::future::{AbortHandle, AbortRegistration};
pub use logscan_core::{DEFAULT_PROBLEM_CAP, ScanReport};
pub use logscan_types::{
    DiagnosticSeverity, DiagnosticsSnapshot, LogDiagnostic, ScanCounters, ScanEnd, ScanStatus,
    ScanSummary, SourceId,
};
