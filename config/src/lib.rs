//! Configuration for logscan.
//!
//! Read from `~/.logscan/config.toml` (or the file named by `LOGSCAN_CONFIG`).
//! A missing file is not an error: every setting has a default.
//!
//! ```toml
//! [scan]
//! cap = 499
//! extra_issue_patterns = ["timed out after \\d+s"]
//! log_extensions = ["log", "lst"]
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "LOGSCAN_CONFIG";

const DEFAULT_CAP: u32 = 499;
const DEFAULT_LARGE_FILE_BYTES: u64 = 50 * 1024 * 1024;

fn default_cap() -> u32 {
    DEFAULT_CAP
}

fn default_log_extensions() -> Vec<String> {
    vec!["log".to_string()]
}

fn default_log_language_ids() -> Vec<String> {
    vec!["log".to_string()]
}

fn default_large_file_bytes() -> u64 {
    DEFAULT_LARGE_FILE_BYTES
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogscanConfig {
    pub scan: Option<ScanConfig>,
}

/// `[scan]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Counted problems (errors + warnings + issue notes) after which a scan stops.
    #[serde(default = "default_cap")]
    pub cap: u32,
    /// Replaces the built-in issue pattern list when set.
    #[serde(default)]
    pub issue_patterns: Option<Vec<String>>,
    /// Appended to the built-in (or replaced) issue pattern list.
    #[serde(default)]
    pub extra_issue_patterns: Vec<String>,
    /// File extensions (without the dot) recognized as logs.
    #[serde(default = "default_log_extensions")]
    pub log_extensions: Vec<String>,
    /// Host language identifiers recognized as logs.
    #[serde(default = "default_log_language_ids")]
    pub log_language_ids: Vec<String>,
    /// Files above this size are logged as large before scanning.
    #[serde(default = "default_large_file_bytes")]
    pub large_file_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            cap: DEFAULT_CAP,
            issue_patterns: None,
            extra_issue_patterns: Vec::new(),
            log_extensions: default_log_extensions(),
            log_language_ids: default_log_language_ids(),
            large_file_bytes: DEFAULT_LARGE_FILE_BYTES,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl LogscanConfig {
    /// Load the config from its default location.
    ///
    /// Returns `Ok(None)` when no config file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// The `[scan]` table, or defaults when absent.
    #[must_use]
    pub fn scan_or_default(&self) -> ScanConfig {
        self.scan.clone().unwrap_or_default()
    }
}

/// `$LOGSCAN_CONFIG` if set, otherwise `~/.logscan/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Ok(explicit) = env::var(CONFIG_PATH_ENV)
        && !explicit.trim().is_empty()
    {
        return Some(PathBuf::from(explicit));
    }
    dirs::home_dir().map(|home| home.join(".logscan").join("config.toml"))
}
