//! One-slot cache for the most recently fetched history window.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entry::HistoryEntry;

/// Identifies a fetched window: the day count plus the source label
/// (`None` means all sources merged).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheKey {
    pub days: u32,
    pub source: Option<String>,
}

impl CacheKey {
    #[must_use]
    pub const fn all_sources(days: u32) -> Self {
        Self { days, source: None }
    }
}

/// What is known about the cached window, reported alongside results.
#[derive(Debug, Clone, Serialize)]
pub struct CacheMetadata {
    pub days: u32,
    pub source: Option<String>,
    pub fetched_at: DateTime<Utc>,
    pub entry_count: usize,
}

#[derive(Debug)]
struct CachedWindow {
    entries: Vec<HistoryEntry>,
    metadata: CacheMetadata,
}

/// Single-slot, in-memory cache. The slot is overwritten wholesale on every
/// successful fetch; a hit requires the key to match exactly, no partial
/// reuse across different windows. Never persisted to disk.
#[derive(Debug, Default)]
pub struct HistoryCache {
    slot: Mutex<Option<CachedWindow>>,
}

impl HistoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries for `key`, or `None` when the slot is empty or holds a
    /// different window.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Vec<HistoryEntry>> {
        let slot = self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        slot.as_ref()
            .filter(|w| w.metadata.days == key.days && w.metadata.source == key.source)
            .map(|w| w.entries.clone())
    }

    /// Entries currently cached, regardless of which window they came from.
    #[must_use]
    pub fn any_entries(&self) -> Option<Vec<HistoryEntry>> {
        let slot = self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        slot.as_ref().map(|w| w.entries.clone())
    }

    pub fn store(&self, key: &CacheKey, entries: Vec<HistoryEntry>) {
        self.store_at(key, entries, Utc::now());
    }

    pub fn store_at(&self, key: &CacheKey, entries: Vec<HistoryEntry>, now: DateTime<Utc>) {
        let metadata = CacheMetadata {
            days: key.days,
            source: key.source.clone(),
            fetched_at: now,
            entry_count: entries.len(),
        };
        let mut slot = self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some(CachedWindow { entries, metadata });
    }

    #[must_use]
    pub fn metadata(&self) -> Option<CacheMetadata> {
        let slot = self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        slot.as_ref().map(|w| w.metadata.clone())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        let slot = self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        slot.is_none()
    }
}
