//! Firefox `places.sqlite` adapter.
//!
//! Timestamps are microseconds since the Unix epoch. Hidden rows and
//! extension-scheme URLs are filtered at the query.

use std::path::Path;

use bh_core::HistoryEntry;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::store::{classify, ensure_positive_days, open_read_only};
use crate::{Browser, FetchError};

const QUERY: &str = "\
SELECT DISTINCT h.url, h.title, h.visit_count, h.last_visit_date
FROM moz_places h
WHERE h.last_visit_date > ?1
  AND h.last_visit_date <= ?2
  AND h.hidden = 0
  AND h.url NOT LIKE 'moz-extension://%'
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
    let conn = open_read_only(Browser::Firefox, path)?;
    let cutoff_micros = (now - Duration::days(i64::from(days))).timestamp_micros();
    let now_micros = now.timestamp_micros();

    let run = || -> Result<Vec<HistoryEntry>, rusqlite::Error> {
        let mut stmt = conn.prepare(QUERY)?;
        let rows = stmt.query_map([cutoff_micros, now_micros], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, Option<i64>>(3)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (url, title, visit_count, last_visit_date) = row?;
            let Some(timestamp) =
                last_visit_date.and_then(DateTime::<Utc>::from_timestamp_micros)
            else {
                warn!(url, "dropping firefox row with malformed timestamp");
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

    let entries = run().map_err(|err| classify(Browser::Firefox, path, err))?;
    debug!(count = entries.len(), days, "fetched firefox history");
    Ok(entries)
}
