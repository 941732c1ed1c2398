//! Chrome `History` database adapter.
//!
//! Chrome stores timestamps as microseconds since 1601-01-01 (the Windows
//! epoch); the offset below rebases them onto the Unix epoch.

use std::path::Path;

use bh_core::HistoryEntry;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::store::{classify, ensure_positive_days, open_read_only};
use crate::{Browser, FetchError};

/// 1970-01-01 minus 1601-01-01, in microseconds.
const WINDOWS_EPOCH_OFFSET_MICROS: i64 = 11_644_473_600_000_000;

const QUERY: &str = "\
SELECT DISTINCT u.url, u.title, u.visit_count, u.last_visit_time
FROM urls u
WHERE u.last_visit_time > ?1
  AND u.last_visit_time <= ?2
  AND u.hidden = 0
ORDER BY u.last_visit_time DESC";

/// Visits from the last `days` days.
pub fn fetch(path: &Path, days: u32) -> Result<Vec<HistoryEntry>, FetchError> {
    fetch_at(path, days, Utc::now())
}

pub fn fetch_at(
    path: &Path,
    days: u32,
    now: DateTime<Utc>,
) -> Result<Vec<HistoryEntry>, FetchError> {
    ensure_positive_days(days)?;
    let conn = open_read_only(Browser::Chrome, path)?;
    let cutoff = (now - Duration::days(i64::from(days))).timestamp_micros()
        + WINDOWS_EPOCH_OFFSET_MICROS;
    let now_windows = now.timestamp_micros() + WINDOWS_EPOCH_OFFSET_MICROS;

    let run = || -> Result<Vec<HistoryEntry>, rusqlite::Error> {
        let mut stmt = conn.prepare(QUERY)?;
        let rows = stmt.query_map([cutoff, now_windows], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, Option<i64>>(3)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (url, title, visit_count, last_visit_time) = row?;
            let Some(timestamp) = last_visit_time
                .map(|t| t - WINDOWS_EPOCH_OFFSET_MICROS)
                .and_then(DateTime::<Utc>::from_timestamp_micros)
            else {
                warn!(url, "dropping chrome row with malformed timestamp");
                continue;
            };
            let visit_count = u32::try_from(visit_count.unwrap_or(0)).unwrap_or(0);
            if let Some(entry) = HistoryEntry::new(&url, title.as_deref(), visit_count, timestamp)
            {
                entries.push(entry);
            }
        }
        Ok(entries)
    };

    let entries = run().map_err(|err| classify(Browser::Chrome, path, err))?;
    debug!(count = entries.len(), days, "fetched chrome history");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use tempfile::TempDir;

    fn chrome_micros(ts: &str) -> i64 {
        ts.parse::<DateTime<Utc>>().unwrap().timestamp_micros() + WINDOWS_EPOCH_OFFSET_MICROS
    }

    fn fixture(rows: &[(&str, Option<&str>, i64, i64, i64)]) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("History");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE urls (
                id INTEGER PRIMARY KEY,
                url TEXT,
                title TEXT,
                visit_count INTEGER,
                last_visit_time INTEGER,
                hidden INTEGER NOT NULL DEFAULT 0
            )",
        )
        .unwrap();
        for (url, title, visits, last_visit, hidden) in rows {
            conn.execute(
                "INSERT INTO urls (url, title, visit_count, last_visit_time, hidden)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![url, title, visits, last_visit, hidden],
            )
            .unwrap();
        }
        (dir, path)
    }

    fn now() -> DateTime<Utc> {
        "2026-01-10T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn windows_epoch_is_rebased_to_utc() {
        let (_dir, path) = fixture(&[(
            "https://a.com/",
            Some("A"),
            4,
            chrome_micros("2026-01-09T08:30:00Z"),
            0,
        )]);
        let entries = fetch_at(&path, 7, now()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].last_visit_time,
            "2026-01-09T08:30:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn day_window_and_hidden_filter_apply() {
        let (_dir, path) = fixture(&[
            ("https://recent.com/", None, 1, chrome_micros("2026-01-09T08:00:00Z"), 0),
            ("https://old.com/", None, 1, chrome_micros("2025-12-01T08:00:00Z"), 0),
            ("https://hidden.com/", None, 1, chrome_micros("2026-01-09T09:00:00Z"), 1),
        ]);
        let entries = fetch_at(&path, 7, now()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "https://recent.com/");
    }

    #[test]
    fn future_dated_rows_are_excluded() {
        let (_dir, path) = fixture(&[
            ("https://recent.com/", None, 1, chrome_micros("2026-01-09T08:00:00Z"), 0),
            ("https://clock-skew.com/", None, 1, chrome_micros("2027-06-01T08:00:00Z"), 0),
        ]);
        let entries = fetch_at(&path, 7, now()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries.iter().all(|e| e.last_visit_time <= now()));
    }

    #[test]
    fn missing_store_is_source_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = fetch_at(&dir.path().join("History"), 7, now()).unwrap_err();
        assert!(matches!(
            err,
            FetchError::SourceUnavailable {
                browser: Browser::Chrome,
                ..
            }
        ));
    }
}
