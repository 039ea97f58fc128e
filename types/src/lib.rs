//! Core domain types for logscan.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! The classifier, the scan engine and every host read and write these types.

#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod diagnostic;
mod snapshot;
mod source;
mod summary;

pub use diagnostic::{DiagnosticSeverity, LogDiagnostic};
pub use snapshot::DiagnosticsSnapshot;
pub use source::{SourceId, SourceIdError};
pub use summary::{ProblemKind, ScanCounters, ScanEnd, ScanStatus, ScanSummary};
