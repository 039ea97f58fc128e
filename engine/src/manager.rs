//! `ScanManager` facade: the API a host (editor integration, CLI) talks to.
//!
//! It routes scan triggers, runs scans as tokio tasks, supersedes in-flight
//! scans of the same source, and owns the diagnostics store and the per-source
//! scan status.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::{AbortHandle, AbortRegistration};
use logscan_core::ScanReport;
use logscan_types::{DiagnosticsSnapshot, LogDiagnostic, ScanStatus, SourceId};
use tokio::task::JoinHandle;

use crate::error::ScanError;
use crate::scan::scan_source;
use crate::settings::ScanSettings;
use crate::source::LogSource;
use crate::store::{DiagnosticsStore, StoreSink};

/// What asked for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanTrigger {
    /// A document was opened.
    Opened,
    /// The active document changed.
    ActiveChanged,
    /// The user ran the scan command explicitly.
    Command,
}

impl ScanTrigger {
    /// Explicit commands scan anything; editor events only scan log documents.
    #[must_use]
    pub fn requires_log_document(self) -> bool {
        !matches!(self, ScanTrigger::Command)
    }
}

struct ActiveScan {
    generation: u64,
    abort: AbortHandle,
}

/// Lock order: `active`, then `store`, then `statuses`. Every path that
/// changes which scan is current for a source holds `active` throughout.
struct Inner {
    settings: ScanSettings,
    store: Arc<Mutex<DiagnosticsStore>>,
    active: Mutex<HashMap<SourceId, ActiveScan>>,
    statuses: Mutex<HashMap<SourceId, ScanStatus>>,
}

/// A scan that has been registered but not yet run.
///
/// Registration is what supersedes the previous scan of the source, so it
/// happens synchronously when the scan is requested.
pub struct PreparedScan {
    source: LogSource,
    generation: u64,
    registration: AbortRegistration,
}

#[derive(Clone)]
pub struct ScanManager {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScanManager {
    #[must_use]
    pub fn new(settings: ScanSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                settings,
                store: Arc::new(Mutex::new(DiagnosticsStore::new())),
                active: Mutex::new(HashMap::new()),
                statuses: Mutex::new(HashMap::new()),
            }),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ScanSettings {
        &self.inner.settings
    }

    /// Register a scan of `source`, aborting any scan already in flight for it.
    pub fn prepare(&self, source: LogSource) -> PreparedScan {
        let id = source.id().clone();
        let (abort, registration) = AbortHandle::new_pair();

        let mut active = lock(&self.inner.active);
        let generation = lock(&self.inner.store).begin_scan(&id);
        let previous = active.insert(id.clone(), ActiveScan { generation, abort });
        if let Some(previous) = previous {
            tracing::debug!(
                source = %id,
                superseded = previous.generation,
                generation,
                "Superseding in-flight scan"
            );
            previous.abort.abort();
        }
        lock(&self.inner.statuses).insert(id, ScanStatus::Scanning);
        drop(active);

        PreparedScan {
            source,
            generation,
            registration,
        }
    }

    /// Run a prepared scan to completion.
    ///
    /// A superseded or cleared scan returns its partial report with a
    /// `Cancelled` end and leaves the store and status untouched.
    pub async fn run(&self, prepared: PreparedScan) -> Result<ScanReport, ScanError> {
        let PreparedScan {
            source,
            generation,
            registration,
        } = prepared;
        let id = source.id().clone();
        let sink = StoreSink::new(Arc::clone(&self.inner.store), generation);

        let result = scan_source(&source, &self.inner.settings, sink, registration).await;
        self.settle(&id, generation, &result);
        result
    }

    /// Prepare and run a scan of `source` on the current task.
    pub async fn scan(&self, source: LogSource) -> Result<ScanReport, ScanError> {
        let prepared = self.prepare(source);
        self.run(prepared).await
    }

    /// Prepare a scan of `source` now and run it on a new tokio task.
    pub fn spawn(&self, source: LogSource) -> JoinHandle<Result<ScanReport, ScanError>> {
        let prepared = self.prepare(source);
        let manager = self.clone();
        tokio::spawn(async move { manager.run(prepared).await })
    }

    /// Entry point for host events. Returns `None` when the trigger does not
    /// apply to the document.
    pub fn trigger(
        &self,
        trigger: ScanTrigger,
        source: LogSource,
        language_id: Option<&str>,
    ) -> Option<JoinHandle<Result<ScanReport, ScanError>>> {
        if trigger.requires_log_document()
            && !self
                .inner
                .settings
                .is_log_document(source.id().as_str(), language_id)
        {
            tracing::trace!(source = %source.id(), ?trigger, "Not a log document; skipping");
            return None;
        }
        Some(self.spawn(source))
    }

    pub fn on_document_closed(&self, source: &SourceId) {
        self.clear(source);
    }

    /// Cancel any scan of `source` and discard its diagnostics and status.
    pub fn clear(&self, source: &SourceId) {
        let mut active = lock(&self.inner.active);
        if let Some(scan) = active.remove(source) {
            scan.abort.abort();
        }
        lock(&self.inner.store).clear(source);
        lock(&self.inner.statuses).remove(source);
    }

    /// Cancel every scan and discard all diagnostics.
    pub fn clear_all(&self) {
        let mut active = lock(&self.inner.active);
        for (_, scan) in active.drain() {
            scan.abort.abort();
        }
        lock(&self.inner.store).clear_all();
        lock(&self.inner.statuses).clear();
    }

    #[must_use]
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        lock(&self.inner.store).snapshot()
    }

    #[must_use]
    pub fn diagnostics(&self, source: &SourceId) -> Vec<LogDiagnostic> {
        lock(&self.inner.store)
            .get(source)
            .map(<[LogDiagnostic]>::to_vec)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn status(&self, source: &SourceId) -> Option<ScanStatus> {
        lock(&self.inner.statuses).get(source).cloned()
    }

    #[must_use]
    pub fn is_scanning(&self, source: &SourceId) -> bool {
        lock(&self.inner.active).contains_key(source)
    }

    fn settle(
        &self,
        id: &SourceId,
        generation: u64,
        result: &Result<ScanReport, ScanError>,
    ) {
        let mut active = lock(&self.inner.active);
        if active.get(id).is_some_and(|a| a.generation == generation) {
            active.remove(id);
        }

        if !lock(&self.inner.store).is_current(id, generation) {
            return;
        }
        let status = match result {
            Ok(report) if report.summary.cancelled() => return,
            Ok(report) => ScanStatus::Finished(report.summary),
            Err(e) => ScanStatus::Failed(e.to_string()),
        };
        lock(&self.inner.statuses).insert(id.clone(), status);
    }
}
