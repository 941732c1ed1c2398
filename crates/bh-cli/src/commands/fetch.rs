//! Fetch command: normalized history entries as JSON.

use std::io::Write;

use anyhow::Result;
use bh_core::{CacheKey, CacheMetadata, HistoryCache, HistoryEntry};
use bh_sources::{fetch_all, fetch_auto, fetch_one, Browser, FetchReport, SourcePaths};
use serde::Serialize;

use super::util::emit;

#[derive(Debug, Serialize)]
struct MergedOutput {
    #[serde(flatten)]
    report: FetchReport,
    cache: Option<CacheMetadata>,
}

#[derive(Debug, Serialize)]
struct SingleSourceOutput {
    source: Browser,
    total_entries: usize,
    entries: Vec<HistoryEntry>,
    cache: Option<CacheMetadata>,
}

/// `all` merges every configured source; otherwise `source` names a
/// browser, and `None` (or `auto`) picks the first available one.
pub fn run<W: Write>(
    writer: &mut W,
    paths: &SourcePaths,
    cache: &HistoryCache,
    days: u32,
    source: Option<&str>,
    all: bool,
) -> Result<()> {
    if all {
        let report = fetch_all(paths, days)?;
        cache.store(&CacheKey::all_sources(days), report.entries.clone());
        return emit(
            writer,
            &MergedOutput {
                report,
                cache: cache.metadata(),
            },
        );
    }

    let (browser, entries) = match source {
        None | Some("auto") => fetch_auto(paths, days)?,
        Some(name) => {
            let browser: Browser = name.parse()?;
            (browser, fetch_one(paths, browser, days)?)
        }
    };
    cache.store(
        &CacheKey {
            days,
            source: Some(browser.as_str().to_string()),
        },
        entries.clone(),
    );
    emit(
        writer,
        &SingleSourceOutput {
            source: browser,
            total_entries: entries.len(),
            entries,
            cache: cache.metadata(),
        },
    )
}
