//! Helpers shared by the subcommands.

use std::io::Write;

use anyhow::Result;
use bh_core::{CacheKey, HistoryCache, HistoryEntry};
use bh_sources::{fetch_all, SourcePaths};
use serde::Serialize;

/// Entries for a day window, from the cache when it holds the exact same
/// window, otherwise fetched fresh and cached.
pub(crate) fn window_entries(
    paths: &SourcePaths,
    cache: &HistoryCache,
    key: &CacheKey,
) -> Result<Vec<HistoryEntry>> {
    if let Some(entries) = cache.get(key) {
        tracing::debug!(days = key.days, "reusing cached history window");
        return Ok(entries);
    }
    let report = fetch_all(paths, key.days)?;
    cache.store(key, report.entries.clone());
    Ok(report.entries)
}

/// Whatever the cache holds, or a fresh default-window fetch when cold.
pub(crate) fn cached_or_default_window(
    paths: &SourcePaths,
    cache: &HistoryCache,
    default_days: u32,
) -> Result<Vec<HistoryEntry>> {
    if let Some(entries) = cache.any_entries() {
        return Ok(entries);
    }
    window_entries(paths, cache, &CacheKey::all_sources(default_days))
}

/// Pretty-printed JSON on stdout is the CLI's whole output contract.
pub(crate) fn emit<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}
