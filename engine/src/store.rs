//! Diagnostics store: the per-source diagnostic sets published by scans.
//!
//! Every scan runs under a generation number drawn from one store-wide
//! counter, so a generation is never reused. A source is current for exactly
//! the generation of its latest scan; publishes carrying any other generation
//! are dropped, so a superseded or cleared scan can never overwrite the set
//! of the scan that replaced it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use logscan_core::DiagnosticSink;
use logscan_types::{DiagnosticsSnapshot, LogDiagnostic, SourceId};

struct SourceEntry {
    generation: u64,
    items: Vec<LogDiagnostic>,
}

#[derive(Default)]
pub(crate) struct DiagnosticsStore {
    data: HashMap<SourceId, SourceEntry>,
    /// Generation of the latest scan per source. Cleared sources have no entry.
    current: HashMap<SourceId, u64>,
    last_generation: u64,
}

impl DiagnosticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new scan of `source`: drops its current set and returns the
    /// generation the new scan must publish under.
    pub fn begin_scan(&mut self, source: &SourceId) -> u64 {
        self.last_generation += 1;
        let generation = self.last_generation;
        self.current.insert(source.clone(), generation);
        self.data.remove(source);
        generation
    }

    pub fn is_current(&self, source: &SourceId, generation: u64) -> bool {
        self.current.get(source) == Some(&generation)
    }

    /// Record the full set published so far by the scan at `generation`.
    ///
    /// Returns `false` when the publish was stale and ignored.
    pub fn publish(&mut self, source: &SourceId, generation: u64, items: &[LogDiagnostic]) -> bool {
        if !self.is_current(source, generation) {
            tracing::trace!(source = %source, generation, "Dropped stale publish");
            return false;
        }
        if items.is_empty() {
            self.data.remove(source);
            return true;
        }
        match self.data.get_mut(source) {
            Some(entry) if entry.generation == generation && entry.items.len() <= items.len() => {
                // Each publish extends the previous one; only the tail is new.
                let known = entry.items.len();
                entry.items.extend_from_slice(&items[known..]);
            }
            _ => {
                self.data.insert(
                    source.clone(),
                    SourceEntry {
                        generation,
                        items: items.to_vec(),
                    },
                );
            }
        }
        true
    }

    /// Discard the set of `source` and invalidate any scan still running for it.
    pub fn clear(&mut self, source: &SourceId) {
        self.current.remove(source);
        self.data.remove(source);
    }

    pub fn clear_all(&mut self) {
        self.current.clear();
        self.data.clear();
    }

    pub fn get(&self, source: &SourceId) -> Option<&[LogDiagnostic]> {
        self.data.get(source).map(|entry| entry.items.as_slice())
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        let mut sources: Vec<(SourceId, Vec<LogDiagnostic>)> = self
            .data
            .iter()
            .map(|(source, entry)| (source.clone(), entry.items.clone()))
            .collect();

        // Sources with errors first, then alphabetically
        sources.sort_by(|a, b| {
            let a_has_errors = a.1.iter().any(|d| d.severity().is_error());
            let b_has_errors = b.1.iter().any(|d| d.severity().is_error());
            b_has_errors.cmp(&a_has_errors).then_with(|| a.0.cmp(&b.0))
        });

        DiagnosticsSnapshot::new(sources)
    }
}

/// Sink that writes one scan's publishes into a shared store.
pub(crate) struct StoreSink {
    store: Arc<Mutex<DiagnosticsStore>>,
    generation: u64,
}

impl StoreSink {
    pub fn new(store: Arc<Mutex<DiagnosticsStore>>, generation: u64) -> Self {
        Self { store, generation }
    }
}

impl DiagnosticSink for StoreSink {
    fn publish(&mut self, source: &SourceId, diagnostics: &[LogDiagnostic]) {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store.publish(source, self.generation, diagnostics);
    }
}
