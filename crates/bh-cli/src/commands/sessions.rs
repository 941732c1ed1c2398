//! Sessions command: segmented, enriched browsing sessions.

use std::io::Write;

use anyhow::Result;
use bh_core::{enrich_session, segment_entries, CacheKey, Categorizer, HistoryCache};
use bh_sources::SourcePaths;

use super::util::{emit, window_entries};

pub fn run<W: Write>(
    writer: &mut W,
    paths: &SourcePaths,
    cache: &HistoryCache,
    categorizer: &Categorizer,
    days: u32,
    max_gap_hours: f64,
) -> Result<()> {
    let entries = window_entries(paths, cache, &CacheKey::all_sources(days))?;
    let lookup = categorizer.lookup(&entries);
    let sessions: Vec<_> = segment_entries(&entries, max_gap_hours)
        .iter()
        .filter_map(|group| enrich_session(group, &lookup))
        .collect();
    tracing::info!(sessions = sessions.len(), days, "segmented history");
    emit(writer, &sessions)
}
