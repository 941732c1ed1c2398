//! Insights command: the full report for one day window.

use std::io::Write;

use anyhow::Result;
use bh_core::{
    build_insights, BrowsingInsights, CacheKey, CacheMetadata, Categorizer, HistoryCache,
};
use bh_sources::SourcePaths;
use serde::Serialize;

use super::util::{emit, window_entries};

#[derive(Debug, Serialize)]
struct InsightsOutput {
    #[serde(flatten)]
    insights: BrowsingInsights,
    cache: Option<CacheMetadata>,
}

pub fn run<W: Write>(
    writer: &mut W,
    paths: &SourcePaths,
    cache: &HistoryCache,
    categorizer: &Categorizer,
    days: u32,
    max_gap_hours: f64,
    top_domains: usize,
) -> Result<()> {
    let key = CacheKey::all_sources(days);
    let entries = window_entries(paths, cache, &key)?;
    let insights = build_insights(&entries, categorizer, max_gap_hours, top_domains);
    // The slot is rewritten even on a cache hit so fetched_at tracks use.
    cache.store(&key, entries);
    emit(
        writer,
        &InsightsOutput {
            insights,
            cache: cache.metadata(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bh_sources::Browser;
    use chrono::Utc;
    use rusqlite::Connection;

    fn firefox_fixture(dir: &tempfile::TempDir, urls: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join("places.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE moz_places (
                id INTEGER PRIMARY KEY,
                url TEXT,
                title TEXT,
                visit_count INTEGER,
                last_visit_date INTEGER,
                hidden INTEGER NOT NULL DEFAULT 0
            )",
        )
        .unwrap();
        let base = Utc::now() - chrono::Duration::hours(2);
        for (i, url) in urls.iter().enumerate() {
            let ts = base + chrono::Duration::minutes(i64::try_from(i).unwrap() * 5);
            conn.execute(
                "INSERT INTO moz_places (url, title, visit_count, last_visit_date)
                 VALUES (?1, 'Title', 2, ?2)",
                rusqlite::params![url, ts.timestamp_micros()],
            )
            .unwrap();
        }
        path
    }

    #[test]
    fn report_covers_every_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = firefox_fixture(
            &dir,
            &["https://github.com/a", "https://reddit.com/b", "https://example.org/c"],
        );
        let paths = SourcePaths::default().with_override(Browser::Firefox, path);
        let cache = HistoryCache::new();
        let categorizer = Categorizer::builtin();

        let mut out = Vec::new();
        run(&mut out, &paths, &cache, &categorizer, 7, 2.0, 10).unwrap();

        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["session_rollups"]["total_sessions"], 1);
        assert!(report["categorized_data"]["development"].is_object());
        assert!(report["categorized_data"]["other"].is_object());
        assert_eq!(report["domain_stats"].as_array().unwrap().len(), 3);
        assert!(report["productivity_metrics"]["total_visits"].as_u64().unwrap() > 0);
        assert!(report["report_summaries"]["typical_session"]
            .as_str()
            .unwrap()
            .starts_with("Typical session"));
        assert_eq!(report["cache"]["days"], 7);
        assert_eq!(report["cache"]["entry_count"], 3);
    }

    #[test]
    fn second_run_reuses_the_cached_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = firefox_fixture(&dir, &["https://github.com/a"]);
        let paths = SourcePaths::default().with_override(Browser::Firefox, path.clone());
        let cache = HistoryCache::new();
        let categorizer = Categorizer::builtin();

        let mut first = Vec::new();
        run(&mut first, &paths, &cache, &categorizer, 7, 2.0, 10).unwrap();

        // Deleting the store proves the second run never re-reads it.
        std::fs::remove_file(&path).unwrap();
        let mut second = Vec::new();
        run(&mut second, &paths, &cache, &categorizer, 7, 2.0, 10).unwrap();

        let a: serde_json::Value = serde_json::from_slice(&first).unwrap();
        let b: serde_json::Value = serde_json::from_slice(&second).unwrap();
        assert_eq!(a["cache"]["entry_count"], b["cache"]["entry_count"]);
        assert_eq!(a["session_rollups"], b["session_rollups"]);
    }
}
