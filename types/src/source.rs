use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a scanned document: a filesystem path or a host URI for buffers
/// that do not live on disk.
///
/// Diagnostics are grouped per `SourceId`. The identifier is never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceId(String);

#[derive(Debug, Error)]
#[error("source identifier must not be empty")]
pub struct SourceIdError;

impl SourceId {
    pub fn new(value: impl Into<String>) -> Result<Self, SourceIdError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(SourceIdError)
        } else {
            Ok(Self(value))
        }
    }

    /// Identifier for an on-disk file. An empty path maps to `"."`.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let display = path.display().to_string();
        if display.trim().is_empty() {
            Self(".".to_string())
        } else {
            Self(display)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment, for log lines and status text.
    #[must_use]
    pub fn basename(&self) -> &str {
        self.0
            .rsplit(['/', '\\'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.0)
    }
}

impl TryFrom<String> for SourceId {
    type Error = SourceIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for SourceId {
    type Error = SourceIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourceId> for String {
    fn from(value: SourceId) -> Self {
        value.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
