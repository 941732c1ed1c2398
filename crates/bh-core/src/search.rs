//! Substring search over fetched history.

use crate::entry::HistoryEntry;

/// Case-insensitive substring match over URL and title, preserving input
/// order. An empty query matches everything.
#[must_use]
pub fn search_entries(entries: &[HistoryEntry], query: &str) -> Vec<HistoryEntry> {
    let query = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| {
            entry.url.to_lowercase().contains(&query)
                || entry
                    .title
                    .as_ref()
                    .is_some_and(|t| t.to_lowercase().contains(&query))
        })
        .cloned()
        .collect()
}
