//! Safari `History.db` adapter.
//!
//! Safari's schema varies by version, so the adapter probes the store's
//! tables and takes the first known shape: the traditional
//! `history_items`/`history_visits` pair, a Chrome-like `urls` table, or a
//! Firefox-like `moz_places` table. Timestamps are seconds since the Unix
//! epoch. An unknown shape is a named condition, not a guess.

use std::path::Path;

use bh_core::HistoryEntry;
use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use tracing::{debug, warn};

use crate::store::{classify, ensure_positive_days, open_read_only, table_names};
use crate::{Browser, FetchError};

const VISITS_QUERY: &str = "\
SELECT hi.url, hi.title, COUNT(hv.id) AS visit_count, MAX(hv.visit_time) AS last_visit_time
FROM history_items hi
JOIN history_visits hv ON hi.id = hv.history_item
WHERE hv.visit_time > ?1
  AND hv.visit_time <= ?2
GROUP BY hi.id, hi.url, hi.title
ORDER BY last_visit_time DESC";

const URLS_QUERY: &str = "\
SELECT DISTINCT u.url, u.title, u.visit_count, u.last_visit_time
FROM urls u
WHERE u.last_visit_time > ?1
  AND u.last_visit_time <= ?2
ORDER BY u.last_visit_time DESC";

const PLACES_QUERY: &str = "\
SELECT DISTINCT h.url, h.title, h.visit_count, h.last_visit_date
FROM moz_places h
WHERE h.last_visit_date > ?1
  AND h.last_visit_date <= ?2
  AND h.hidden = 0
ORDER BY h.last_visit_date DESC";

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
    let conn = open_read_only(Browser::Safari, path)?;
    let tables = table_names(&conn).map_err(|err| classify(Browser::Safari, path, err))?;

    let query = select_query(&tables).ok_or_else(|| FetchError::SchemaUnrecognized {
        browser: Browser::Safari,
        tables: tables.clone(),
    })?;
    #[expect(clippy::cast_precision_loss, reason = "epoch seconds fit in f64 exactly enough")]
    let cutoff_secs = (now - Duration::days(i64::from(days))).timestamp() as f64;
    #[expect(clippy::cast_precision_loss, reason = "epoch seconds fit in f64 exactly enough")]
    let now_secs = now.timestamp() as f64;

    let entries = run_query(&conn, query, cutoff_secs, now_secs)
        .map_err(|err| classify(Browser::Safari, path, err))?;
    debug!(count = entries.len(), days, "fetched safari history");
    Ok(entries)
}

fn select_query(tables: &[String]) -> Option<&'static str> {
    let has = |name: &str| tables.iter().any(|t| t == name);
    if has("history_items") && has("history_visits") {
        Some(VISITS_QUERY)
    } else if has("urls") {
        Some(URLS_QUERY)
    } else if has("moz_places") {
        Some(PLACES_QUERY)
    } else {
        None
    }
}

fn run_query(
    conn: &Connection,
    query: &str,
    cutoff_secs: f64,
    now_secs: f64,
) -> Result<Vec<HistoryEntry>, rusqlite::Error> {
    let mut stmt = conn.prepare(query)?;
    let rows = stmt.query_map([cutoff_secs, now_secs], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, Option<i64>>(2)?,
            row.get::<_, Option<f64>>(3)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (url, title, visit_count, last_visit_time) = row?;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "sub-microsecond fractions are irrelevant here"
        )]
        let Some(timestamp) = last_visit_time
            .map(|secs| (secs * 1_000_000.0) as i64)
            .and_then(DateTime::<Utc>::from_timestamp_micros)
        else {
            warn!(url, "dropping safari row with malformed timestamp");
            continue;
        };
        let visit_count = u32::try_from(visit_count.unwrap_or(0)).unwrap_or(0);
        if let Some(entry) = HistoryEntry::new(&url, title.as_deref(), visit_count, timestamp) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        "2026-01-10T12:00:00Z".parse().unwrap()
    }

    fn secs(ts: &str) -> i64 {
        ts.parse::<DateTime<Utc>>().unwrap().timestamp()
    }

    #[test]
    fn traditional_schema_aggregates_visits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("History.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE history_items (id INTEGER PRIMARY KEY, url TEXT, title TEXT);
             CREATE TABLE history_visits (
                id INTEGER PRIMARY KEY,
                history_item INTEGER,
                visit_time REAL
             );",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO history_items (id, url, title) VALUES (1, 'https://a.com/', 'A')",
            [],
        )
        .unwrap();
        for ts in ["2026-01-09T08:00:00Z", "2026-01-09T09:00:00Z", "2026-01-09T10:00:00Z"] {
            conn.execute(
                "INSERT INTO history_visits (history_item, visit_time) VALUES (1, ?1)",
                [secs(ts)],
            )
            .unwrap();
        }
        drop(conn);

        let entries = fetch_at(&path, 7, now()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].visit_count, 3);
        assert_eq!(
            entries[0].last_visit_time,
            "2026-01-09T10:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn chrome_like_schema_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("History.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE urls (
                id INTEGER PRIMARY KEY,
                url TEXT,
                title TEXT,
                visit_count INTEGER,
                last_visit_time INTEGER
            )",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO urls (url, title, visit_count, last_visit_time)
             VALUES ('https://b.com/', 'B', 2, ?1)",
            [secs("2026-01-09T10:00:00Z")],
        )
        .unwrap();
        drop(conn);

        let entries = fetch_at(&path, 7, now()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "https://b.com/");
    }

    #[test]
    fn future_dated_rows_are_excluded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("History.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE urls (
                id INTEGER PRIMARY KEY,
                url TEXT,
                title TEXT,
                visit_count INTEGER,
                last_visit_time INTEGER
            )",
        )
        .unwrap();
        for (url, ts) in [
            ("https://recent.com/", "2026-01-09T10:00:00Z"),
            ("https://clock-skew.com/", "2027-06-01T10:00:00Z"),
        ] {
            conn.execute(
                "INSERT INTO urls (url, title, visit_count, last_visit_time)
                 VALUES (?1, NULL, 1, ?2)",
                rusqlite::params![url, secs(ts)],
            )
            .unwrap();
        }
        drop(conn);

        let entries = fetch_at(&path, 7, now()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries.iter().all(|e| e.last_visit_time <= now()));
    }

    #[test]
    fn unknown_schema_is_a_named_condition() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("History.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE something_else (id INTEGER PRIMARY KEY)")
            .unwrap();
        drop(conn);

        let err = fetch_at(&path, 7, now()).unwrap_err();
        match err {
            FetchError::SchemaUnrecognized { browser, tables } => {
                assert_eq!(browser, Browser::Safari);
                assert!(tables.contains(&"something_else".to_string()));
            }
            other => panic!("expected SchemaUnrecognized, got {other}"),
        }
    }
}
