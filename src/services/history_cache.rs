//! Bounded, persisted log of accepted analyses.
//!
//! The whole collection is stored as one JSON array under a single key and
//! rewritten on every change. Storage problems never reach the user: a
//! failed or malformed load starts empty, a failed write is logged.

use std::sync::Arc;

use crate::domain::models::{AnalysisResult, HistoryEntry, HISTORY_STORAGE_KEY};
use crate::domain::ports::KeyValueStore;

pub struct HistoryCache {
    store: Arc<dyn KeyValueStore>,
    capacity: usize,
    /// Most recent first.
    entries: Vec<HistoryEntry>,
}

impl HistoryCache {
    /// Empty cache that has not read from the store.
    pub fn new(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self {
            store,
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    /// Build a cache and populate it from the store.
    pub async fn load(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        let mut cache = Self::new(store, capacity);
        cache.entries = cache.load_entries().await;
        cache
    }

    /// Read the persisted sequence. Missing or unreadable data yields empty.
    pub async fn load_entries(&self) -> Vec<HistoryEntry> {
        let raw = match self.store.get(HISTORY_STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read analysis history, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(self.capacity);
                tracing::debug!(count = entries.len(), "loaded analysis history");
                entries
            }
            Err(e) => {
                tracing::warn!(error = %e, "persisted analysis history is malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Record an accepted result and persist.
    ///
    /// Ids are creation timestamps in milliseconds, nudged forward when two
    /// records land in the same millisecond so they stay unique.
    pub async fn record(&mut self, text: impl Into<String>, result: AnalysisResult) -> HistoryEntry {
        let now = chrono::Utc::now().timestamp_millis();
        let id = match self.entries.first() {
            Some(newest) if newest.id >= now => newest.id.saturating_add(1),
            _ => now,
        };
        let entry = HistoryEntry::new(id, text, result);
        self.record_entry(entry.clone()).await;
        entry
    }

    /// Prepend an entry, evict past capacity and persist.
    pub async fn record_entry(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
        self.persist().await;
    }

    pub async fn clear(&mut self) {
        self.entries.clear();
        self.persist().await;
    }

    /// Write the whole sequence under the storage key.
    pub async fn persist(&self) {
        let payload = match serde_json::to_string(&self.entries) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize analysis history");
                return;
            }
        };
        if let Err(e) = self.store.put(HISTORY_STORAGE_KEY, &payload).await {
            tracing::warn!(error = %e, count = self.entries.len(), "failed to persist analysis history");
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: i64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entry by display position, 1 being the most recent.
    pub fn get_index(&self, position: usize) -> Option<&HistoryEntry> {
        position.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for HistoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryCache")
            .field("capacity", &self.capacity)
            .field("len", &self.entries.len())
            .finish()
    }
}
