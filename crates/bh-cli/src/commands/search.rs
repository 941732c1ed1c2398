//! Search command: substring match over fetched history.

use std::io::Write;

use anyhow::Result;
use bh_core::{search_entries, HistoryCache, HistoryEntry};
use bh_sources::SourcePaths;
use serde::Serialize;

use super::util::{cached_or_default_window, emit};

#[derive(Debug, Serialize)]
struct SearchOutput {
    query: String,
    total_matches: usize,
    entries: Vec<HistoryEntry>,
}

pub fn run<W: Write>(
    writer: &mut W,
    paths: &SourcePaths,
    cache: &HistoryCache,
    query: &str,
    default_days: u32,
) -> Result<()> {
    let entries = cached_or_default_window(paths, cache, default_days)?;
    let matches = search_entries(&entries, query);
    emit(
        writer,
        &SearchOutput {
            query: query.to_string(),
            total_matches: matches.len(),
            entries: matches,
        },
    )
}
