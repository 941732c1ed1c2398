//! Normalized history entry type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single normalized browser visit record.
///
/// Source adapters convert their native timestamp epochs to UTC before
/// producing entries, so every `last_visit_time` is directly comparable
/// regardless of which browser it came from. Entries with an empty URL are
/// dropped at the adapter boundary and never reach the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub title: Option<String>,
    pub visit_count: u32,
    pub last_visit_time: DateTime<Utc>,
}

impl HistoryEntry {
    /// Creates an entry, returning `None` for an empty URL.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        title: Option<&str>,
        visit_count: u32,
        last_visit_time: DateTime<Utc>,
    ) -> Option<Self> {
        let url = url.into();
        if url.is_empty() {
            return None;
        }
        // Empty titles carry no information; normalize them away.
        let title = title.filter(|t| !t.is_empty()).map(str::to_string);
        Some(Self {
            url,
            title,
            visit_count,
            last_visit_time,
        })
    }

    /// The lower-cased host component of the URL, or an empty string when
    /// the URL has no parsable host.
    #[must_use]
    pub fn host(&self) -> String {
        host_of(&self.url)
    }

    /// Visit weight used for category and domain statistics.
    ///
    /// A stored count of zero still represents at least one observed visit.
    #[must_use]
    pub const fn visit_weight(&self) -> u64 {
        if self.visit_count == 0 {
            1
        } else {
            self.visit_count as u64
        }
    }
}

/// Extracts the lower-cased host from a URL string.
///
/// Returns an empty string for URLs without a network location, matching
/// how such entries fall through to the `other` bucket.
#[must_use]
pub fn host_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default()
}
