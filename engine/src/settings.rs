//! Resolved scan settings.
//!
//! [`ScanConfig`] is what the user wrote; [`ScanSettings`] is what a scan
//! runs with: a validated cap and a compiled issue detector.

use std::path::Path;

use logscan_config::ScanConfig;
use logscan_core::{DEFAULT_ISSUE_PATTERNS, DEFAULT_PROBLEM_CAP, IssueDetector};

use crate::error::SettingsError;

#[derive(Debug, Clone)]
pub struct ScanSettings {
    cap: u32,
    detector: IssueDetector,
    log_extensions: Vec<String>,
    log_language_ids: Vec<String>,
    large_file_bytes: u64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        let config = ScanConfig::default();
        Self {
            cap: DEFAULT_PROBLEM_CAP,
            detector: IssueDetector::default(),
            log_extensions: config.log_extensions,
            log_language_ids: config.log_language_ids,
            large_file_bytes: config.large_file_bytes,
        }
    }
}

impl ScanSettings {
    pub fn from_config(config: &ScanConfig) -> Result<Self, SettingsError> {
        if config.cap == 0 {
            return Err(SettingsError::ZeroCap);
        }

        let base: Vec<(String, String)> = match &config.issue_patterns {
            Some(custom) => custom
                .iter()
                .enumerate()
                .map(|(i, p)| (format!("custom-{i}"), p.clone()))
                .collect(),
            None => DEFAULT_ISSUE_PATTERNS
                .iter()
                .map(|p| (p.label.to_string(), p.pattern.to_string()))
                .collect(),
        };
        let extra = config
            .extra_issue_patterns
            .iter()
            .enumerate()
            .map(|(i, p)| (format!("extra-{i}"), p.clone()));
        let detector = IssueDetector::new(base.into_iter().chain(extra))?;

        tracing::debug!(
            cap = config.cap,
            issue_patterns = detector.len(),
            "Resolved scan settings"
        );

        Ok(Self {
            cap: config.cap,
            detector,
            log_extensions: config.log_extensions.clone(),
            log_language_ids: config.log_language_ids.clone(),
            large_file_bytes: config.large_file_bytes,
        })
    }

    #[must_use]
    pub fn with_cap(mut self, cap: u32) -> Self {
        self.cap = cap.max(1);
        self
    }

    #[must_use]
    pub fn cap(&self) -> u32 {
        self.cap
    }

    #[must_use]
    pub fn detector(&self) -> &IssueDetector {
        &self.detector
    }

    #[must_use]
    pub fn large_file_bytes(&self) -> u64 {
        self.large_file_bytes
    }

    /// Whether a document is a log: its language id is a log language, or its
    /// name carries a log extension (case-insensitive).
    #[must_use]
    pub fn is_log_document(&self, name: &str, language_id: Option<&str>) -> bool {
        if let Some(lang) = language_id
            && self.log_language_ids.iter().any(|id| id == lang)
        {
            return true;
        }
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.log_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}
