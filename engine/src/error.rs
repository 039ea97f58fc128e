use std::io;

use logscan_core::InvalidIssuePattern;
use logscan_types::{ScanCounters, SourceId};
use thiserror::Error;

/// A scan that could not read its input.
///
/// Diagnostics flushed before a read failure stay published.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to open {source_id}: {error}")]
    Open {
        source_id: SourceId,
        #[source]
        error: io::Error,
    },
    #[error("failed to read {source_id} after {lines} lines ({counters}): {error}")]
    Read {
        source_id: SourceId,
        lines: u32,
        counters: ScanCounters,
        #[source]
        error: io::Error,
    },
}

impl ScanError {
    #[must_use]
    pub fn source_id(&self) -> &SourceId {
        match self {
            ScanError::Open { source_id, .. } | ScanError::Read { source_id, .. } => source_id,
        }
    }

    /// Counts accumulated before the failure (zero when the input never opened).
    #[must_use]
    pub fn counters(&self) -> ScanCounters {
        match self {
            ScanError::Open { .. } => ScanCounters::default(),
            ScanError::Read { counters, .. } => *counters,
        }
    }
}

/// Invalid scan configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("scan cap must be at least 1")]
    ZeroCap,
    #[error(transparent)]
    Pattern(#[from] InvalidIssuePattern),
}
