//! Suggest command: URLs that fell through the category rules.

use std::io::Write;

use anyhow::Result;
use bh_core::{categories::OTHER_CATEGORY, Categorizer, HistoryCache};
use bh_sources::SourcePaths;
use serde::Serialize;

use super::util::{cached_or_default_window, emit};

#[derive(Debug, Serialize)]
struct SuggestOutput {
    urls_without_categories: Vec<String>,
}

pub fn run<W: Write>(
    writer: &mut W,
    paths: &SourcePaths,
    cache: &HistoryCache,
    categorizer: &Categorizer,
    default_days: u32,
) -> Result<()> {
    let entries = cached_or_default_window(paths, cache, default_days)?;
    let buckets = categorizer.categorize(&entries);
    let urls_without_categories = buckets
        .get(OTHER_CATEGORY)
        .map(|bucket| bucket.entries.iter().map(|e| e.url.clone()).collect())
        .unwrap_or_default();
    emit(writer, &SuggestOutput { urls_without_categories })
}
