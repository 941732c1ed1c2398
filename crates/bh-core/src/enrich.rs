//! Session enrichment: derived metrics, flags, and summaries.
//!
//! Threshold and boundary values here are exact contracts; downstream
//! reporting keys off them.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;

use crate::categories::{PRODUCTIVE_CATEGORIES, UNPRODUCTIVE_CATEGORIES};
use crate::categorize::CategoryMatch;
use crate::counter::Counter;
use crate::entry::HistoryEntry;

/// Fixed time-of-day buckets keyed by the session's starting hour (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    EarlyMorning,
    Morning,
    Lunch,
    Afternoon,
    Evening,
    Night,
    LateNight,
}

impl TimePeriod {
    /// Bucket boundaries: [5,9) early_morning, [9,12) morning, [12,13)
    /// lunch, [13,17) afternoon, [17,20) evening, [20,23) night, else
    /// late_night.
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            5..=8 => Self::EarlyMorning,
            9..=11 => Self::Morning,
            12 => Self::Lunch,
            13..=16 => Self::Afternoon,
            17..=19 => Self::Evening,
            20..=22 => Self::Night,
            _ => Self::LateNight,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EarlyMorning => "early_morning",
            Self::Morning => "morning",
            Self::Lunch => "lunch",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
            Self::LateNight => "late_night",
        }
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete session classification by productive/unproductive share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    HighlyProductive,
    MostlyProductive,
    Leisure,
    MostlyLeisure,
    Mixed,
}

impl SessionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighlyProductive => "highly_productive",
            Self::MostlyProductive => "mostly_productive",
            Self::Leisure => "leisure",
            Self::MostlyLeisure => "mostly_leisure",
            Self::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When the session happened.
#[derive(Debug, Clone, Serialize)]
pub struct TimePatterns {
    pub day_of_week: String,
    pub is_weekend: bool,
    pub hour_of_day: u32,
    pub time_period: TimePeriod,
}

/// How scattered the session was across domains.
#[derive(Debug, Clone, Serialize)]
pub struct FocusMetrics {
    pub unique_domains: usize,
    pub domain_switches: usize,
    pub avg_time_per_domain: f64,
    pub top_domains: Vec<(String, usize)>,
    pub focus_score: f64,
}

/// Boolean character flags plus the productive share.
#[derive(Debug, Clone, Serialize)]
pub struct SessionCharacteristics {
    pub is_rabbit_hole: bool,
    pub is_research: bool,
    pub is_productive: bool,
    pub productivity_ratio: f64,
}

/// A segmented session with all derived analytics attached.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedSession {
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: f64,
    pub entry_count: usize,
    pub time_patterns: TimePatterns,
    pub category_distribution: BTreeMap<String, usize>,
    pub subcategory_distribution: BTreeMap<String, usize>,
    pub dominant_category: String,
    pub session_type: SessionKind,
    pub focus_metrics: FocusMetrics,
    pub characteristics: SessionCharacteristics,
    pub summary: String,
    pub entries: Vec<HistoryEntry>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[expect(clippy::cast_precision_loss, reason = "session sizes are small")]
fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Focus score in [0, 1]: 1 − min(1, (switch rate + domain rate) / 2).
///
/// Zero duration is defined as zero, not an error.
#[expect(clippy::cast_precision_loss, reason = "session sizes are small")]
fn focus_score(unique_domains: usize, domain_switches: usize, duration_minutes: f64) -> f64 {
    if duration_minutes == 0.0 {
        return 0.0;
    }
    let switches_per_minute = domain_switches as f64 / duration_minutes;
    let domains_per_minute = unique_domains as f64 / duration_minutes;
    let scatter = ((switches_per_minute + domains_per_minute) / 2.0).min(1.0);
    round2(1.0 - scatter)
}

#[expect(clippy::cast_precision_loss, reason = "session sizes are small")]
fn classify(productive: usize, unproductive: usize, total: usize) -> SessionKind {
    let total = total as f64;
    let productive = productive as f64;
    let unproductive = unproductive as f64;
    // Productive thresholds are checked first, in this fixed order.
    if productive > total * 0.7 {
        SessionKind::HighlyProductive
    } else if productive > total * 0.5 {
        SessionKind::MostlyProductive
    } else if unproductive > total * 0.7 {
        SessionKind::Leisure
    } else if unproductive > total * 0.5 {
        SessionKind::MostlyLeisure
    } else {
        SessionKind::Mixed
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "durations are non-negative and small"
)]
fn summary_line(
    session_type: SessionKind,
    time_period: TimePeriod,
    duration_minutes: f64,
    dominant_category: &str,
    is_rabbit_hole: bool,
    is_research: bool,
) -> String {
    let duration_desc = if duration_minutes < 5.0 {
        "quick"
    } else if duration_minutes < 15.0 {
        "short"
    } else if duration_minutes < 45.0 {
        "moderate"
    } else if duration_minutes < 90.0 {
        "long"
    } else {
        "extended"
    };
    let minutes = duration_minutes.round() as u64;

    let lead = if is_rabbit_hole {
        format!("A {duration_desc} {dominant_category} rabbit hole")
    } else if is_research {
        format!("A {duration_desc} research session on {dominant_category}")
    } else {
        format!("A {duration_desc} {session_type} session")
    };
    format!("{lead} during the {time_period} ({minutes} minutes)")
}

/// Enriches one segmented session.
///
/// `entries` must be the time-ordered group produced by
/// [`crate::segment::segment_entries`]; returns `None` for an empty group.
#[must_use]
pub fn enrich_session(
    entries: &[HistoryEntry],
    lookup: &HashMap<String, CategoryMatch>,
) -> Option<EnrichedSession> {
    let first = entries.first()?;
    let last = entries.last()?;
    let start_time = first.last_visit_time;
    let end_time = last.last_visit_time;
    #[expect(clippy::cast_precision_loss, reason = "durations are far below 2^52 ms")]
    let duration_minutes = (end_time - start_time).num_milliseconds() as f64 / 60_000.0;
    let total = entries.len();

    let mut category_counts = Counter::new();
    let mut subcategory_counts = Counter::new();
    let mut domains_visited = Counter::new();
    let mut domain_switches = 0;
    let mut last_host: Option<String> = None;
    for entry in entries {
        let host = entry.host();
        domains_visited.add(&host);
        if let Some(prev) = &last_host {
            if !prev.is_empty() && *prev != host {
                domain_switches += 1;
            }
        }
        last_host = Some(host);

        if let Some(matched) = lookup.get(&entry.url) {
            category_counts.add(&matched.category);
            if let Some(sub) = &matched.subcategory {
                subcategory_counts.add(sub);
            }
        }
    }

    let productive_count: usize = PRODUCTIVE_CATEGORIES
        .iter()
        .map(|c| category_counts.get(c))
        .sum();
    let unproductive_count: usize = UNPRODUCTIVE_CATEGORIES
        .iter()
        .map(|c| category_counts.get(c))
        .sum();
    let session_type = classify(productive_count, unproductive_count, total);

    let hour = start_time.hour();
    let time_patterns = TimePatterns {
        day_of_week: start_time.format("%A").to_string(),
        is_weekend: matches!(
            start_time.weekday(),
            chrono::Weekday::Sat | chrono::Weekday::Sun
        ),
        hour_of_day: hour,
        time_period: TimePeriod::from_hour(hour),
    };

    let unique_domains = domains_visited.len();
    let avg_time_per_domain = if unique_domains > 0 {
        #[expect(clippy::cast_precision_loss, reason = "session sizes are small")]
        let avg = duration_minutes / unique_domains as f64;
        round1(avg)
    } else {
        0.0
    };

    let is_rabbit_hole =
        unique_domains <= 3 && duration_minutes > 30.0 && domains_visited.max_count() > 5;
    let learning_dev =
        category_counts.get("learning") + category_counts.get("development");
    #[expect(clippy::cast_precision_loss, reason = "session sizes are small")]
    let is_research = learning_dev as f64 > total as f64 * 0.5 && unique_domains >= 5;

    let dominant_category = category_counts
        .top()
        .unwrap_or("uncategorized")
        .to_string();
    let summary_category = category_counts.top().unwrap_or("browsing");
    let summary = summary_line(
        session_type,
        time_patterns.time_period,
        duration_minutes,
        summary_category,
        is_rabbit_hole,
        is_research,
    );

    Some(EnrichedSession {
        session_id: format!("{}_{total}", start_time.to_rfc3339()),
        start_time,
        end_time,
        duration_minutes: round1(duration_minutes),
        entry_count: total,
        time_patterns,
        category_distribution: category_counts
            .iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        subcategory_distribution: subcategory_counts
            .iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        dominant_category,
        session_type,
        focus_metrics: FocusMetrics {
            unique_domains,
            domain_switches,
            avg_time_per_domain,
            top_domains: domains_visited.most_common(3),
            focus_score: focus_score(unique_domains, domain_switches, duration_minutes),
        },
        characteristics: SessionCharacteristics {
            is_rabbit_hole,
            is_research,
            is_productive: productive_count > unproductive_count,
            productivity_ratio: round2(ratio(productive_count, total)),
        },
        summary,
        entries: entries.to_vec(),
    })
}
