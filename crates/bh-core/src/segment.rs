//! Session segmentation by inactivity gaps.

use crate::entry::HistoryEntry;

/// Default inactivity gap, in hours, that closes a session.
pub const DEFAULT_MAX_GAP_HOURS: f64 = 2.0;

/// Partitions entries into sessions.
///
/// Entries are stable-sorted by timestamp, then walked once: a gap greater
/// than `max_gap_hours` (fractional hours supported) between adjacent
/// entries closes the open session. Concatenating the returned groups
/// reproduces the time-sorted input exactly; a single entry is a valid
/// session.
#[must_use]
pub fn segment_entries(entries: &[HistoryEntry], max_gap_hours: f64) -> Vec<Vec<HistoryEntry>> {
    if entries.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<HistoryEntry> = entries.to_vec();
    sorted.sort_by_key(|e| e.last_visit_time);

    let mut sessions = Vec::new();
    let mut current: Vec<HistoryEntry> = Vec::new();
    for entry in sorted {
        if let Some(last) = current.last() {
            let gap = entry.last_visit_time - last.last_visit_time;
            #[expect(clippy::cast_precision_loss, reason = "gaps are far below 2^52 ms")]
            let gap_hours = gap.num_milliseconds() as f64 / 3_600_000.0;
            if gap_hours > max_gap_hours {
                sessions.push(std::mem::take(&mut current));
            }
        }
        current.push(entry);
    }
    if !current.is_empty() {
        sessions.push(current);
    }
    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn entry(url: &str, ts: &str) -> HistoryEntry {
        let ts: DateTime<Utc> = ts.parse().unwrap();
        HistoryEntry::new(url, None, 1, ts).unwrap()
    }

    #[test]
    fn gap_over_threshold_splits_sessions() {
        // 13:00 - 10:05 = 2h55m > 2h, so two sessions.
        let entries = vec![
            entry("https://a.com/1", "2026-01-05T10:00:00Z"),
            entry("https://a.com/2", "2026-01-05T10:05:00Z"),
            entry("https://a.com/3", "2026-01-05T13:00:00Z"),
        ];
        let sessions = segment_entries(&entries, 2.0);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].len(), 2);
        assert_eq!(sessions[1].len(), 1);
        assert_eq!(sessions[1][0].url, "https://a.com/3");
    }

    #[test]
    fn gap_equal_to_threshold_stays_in_session() {
        let entries = vec![
            entry("https://a.com/1", "2026-01-05T10:00:00Z"),
            entry("https://a.com/2", "2026-01-05T12:00:00Z"),
        ];
        let sessions = segment_entries(&entries, 2.0);
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn fractional_threshold_is_honored() {
        let entries = vec![
            entry("https://a.com/1", "2026-01-05T10:00:00Z"),
            entry("https://a.com/2", "2026-01-05T10:40:00Z"),
        ];
        // 40 minutes > 0.5 hours
        let sessions = segment_entries(&entries, 0.5);
        assert_eq!(sessions.len(), 2);
        let sessions = segment_entries(&entries, 0.75);
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn single_entry_is_a_session() {
        let entries = vec![entry("https://a.com/1", "2026-01-05T10:00:00Z")];
        let sessions = segment_entries(&entries, 2.0);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].len(), 1);
    }

    #[test]
    fn empty_input_yields_no_sessions() {
        assert!(segment_entries(&[], 2.0).is_empty());
    }

    #[test]
    fn partition_is_complete_and_order_preserving() {
        let entries = vec![
            entry("https://a.com/3", "2026-01-05T15:00:00Z"),
            entry("https://a.com/1", "2026-01-05T09:00:00Z"),
            entry("https://a.com/4", "2026-01-05T15:30:00Z"),
            entry("https://a.com/2", "2026-01-05T09:20:00Z"),
        ];
        let sessions = segment_entries(&entries, 2.0);

        let flattened: Vec<&HistoryEntry> = sessions.iter().flatten().collect();
        assert_eq!(flattened.len(), entries.len());
        for pair in flattened.windows(2) {
            assert!(pair[0].last_visit_time <= pair[1].last_visit_time);
        }
        // Every within-session gap respects the threshold; the gap spanning
        // consecutive sessions exceeds it.
        for session in &sessions {
            for pair in session.windows(2) {
                assert!(pair[1].last_visit_time - pair[0].last_visit_time <= chrono::Duration::hours(2));
            }
        }
        for pair in sessions.windows(2) {
            let last = pair[0].last().unwrap();
            let first = pair[1].first().unwrap();
            assert!(first.last_visit_time - last.last_visit_time > chrono::Duration::hours(2));
        }
    }
}
