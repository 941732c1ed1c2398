//! Report-ready insight rollups over a fetched history window.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::categories::{PRODUCTIVE_CATEGORIES, UNPRODUCTIVE_CATEGORIES};
use crate::categorize::{CategorizedBucket, Categorizer};
use crate::counter::Counter;
use crate::enrich::{enrich_session, EnrichedSession};
use crate::entry::HistoryEntry;
use crate::segment::segment_entries;

/// Default number of domains kept in the frequency table.
pub const DEFAULT_TOP_DOMAINS: usize = 10;

/// Per-domain visit statistics, ranked by total visit weight.
#[derive(Debug, Clone, Serialize)]
pub struct DomainStat {
    pub domain: String,
    pub unique_pages: usize,
    pub total_visits: u64,
    pub sample_titles: Vec<String>,
}

/// A progression of at least three visits around one technology.
#[derive(Debug, Clone, Serialize)]
pub struct LearningPath {
    pub technology: String,
    pub visit_count: usize,
    pub resource_types: BTreeMap<String, usize>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub sample_resources: Vec<HistoryEntry>,
}

/// Visit-weight productivity ratios over the whole window.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductivityMetrics {
    pub productivity_ratio: f64,
    pub distraction_ratio: f64,
    pub productive_visits: u64,
    pub unproductive_visits: u64,
    pub total_visits: u64,
    pub top_productive_sites: Vec<(String, usize)>,
    pub top_distraction_sites: Vec<(String, usize)>,
}

/// Aggregates across all enriched sessions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionRollups {
    pub total_sessions: usize,
    pub avg_session_duration: f64,
    pub session_types: BTreeMap<String, usize>,
    pub time_period_distribution: BTreeMap<String, usize>,
    pub productive_sessions: usize,
    pub rabbit_holes: Vec<EnrichedSession>,
    pub research_sessions: Vec<EnrichedSession>,
    pub weekend_sessions: usize,
    pub weekday_sessions: usize,
}

/// Pre-formatted one-line summaries for report generation.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummaries {
    pub typical_session: String,
    pub productivity_summary: String,
    pub time_habits: String,
    pub focus_analysis: String,
}

/// The full insight report for one time window.
#[derive(Debug, Clone, Serialize)]
pub struct BrowsingInsights {
    pub sessions: Vec<EnrichedSession>,
    pub session_rollups: SessionRollups,
    pub categorized_data: BTreeMap<String, CategorizedBucket>,
    pub domain_stats: Vec<DomainStat>,
    pub learning_paths: Vec<LearningPath>,
    pub productivity_metrics: ProductivityMetrics,
    pub report_summaries: ReportSummaries,
}

/// Builds the complete insight report over an already-fetched entry list.
///
/// Every sub-step degrades to empty/zero defaults on empty input; nothing
/// here fails for well-formed entries.
#[must_use]
pub fn build_insights(
    entries: &[HistoryEntry],
    categorizer: &Categorizer,
    max_gap_hours: f64,
    top_domains: usize,
) -> BrowsingInsights {
    let lookup = categorizer.lookup(entries);
    let sessions: Vec<EnrichedSession> = segment_entries(entries, max_gap_hours)
        .iter()
        .filter_map(|group| enrich_session(group, &lookup))
        .collect();

    let categorized_data = categorizer.categorize(entries);
    let domain_stats = domain_frequency(entries, top_domains);
    let learning_paths = find_learning_paths(entries);
    let productivity_metrics = productivity_metrics(&categorized_data);
    let session_rollups = session_rollups(&sessions);
    let report_summaries = ReportSummaries {
        typical_session: describe_typical_session(&sessions),
        productivity_summary: productivity_summary(&sessions),
        time_habits: describe_time_habits(&sessions, categorizer),
        focus_analysis: analyze_focus_patterns(&sessions),
    };

    BrowsingInsights {
        sessions,
        session_rollups,
        categorized_data,
        domain_stats,
        learning_paths,
        productivity_metrics,
        report_summaries,
    }
}

/// Top-N domains by total visit weight; ties keep first appearance.
#[must_use]
pub fn domain_frequency(entries: &[HistoryEntry], top_n: usize) -> Vec<DomainStat> {
    let mut order: Vec<String> = Vec::new();
    let mut stats: BTreeMap<String, DomainStat> = BTreeMap::new();
    for entry in entries {
        let domain = entry.host();
        if domain.is_empty() {
            continue;
        }
        let stat = stats.entry(domain.clone()).or_insert_with(|| {
            order.push(domain.clone());
            DomainStat {
                domain,
                unique_pages: 0,
                total_visits: 0,
                sample_titles: Vec::new(),
            }
        });
        stat.unique_pages += 1;
        stat.total_visits += entry.visit_weight();
        if let Some(title) = &entry.title {
            if stat.sample_titles.len() < 5 && !stat.sample_titles.contains(title) {
                stat.sample_titles.push(title.clone());
            }
        }
    }

    let mut ranked: Vec<DomainStat> = order
        .iter()
        .filter_map(|domain| stats.remove(domain))
        .collect();
    ranked.sort_by(|a, b| b.total_visits.cmp(&a.total_visits));
    ranked.truncate(top_n);
    ranked
}

static TECH_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("python", r"python|django|flask|pandas|numpy"),
        ("javascript", r"javascript|js|react|vue|angular|node"),
        ("rust", r"rust-lang|rust"),
        ("go", r"golang|go-lang"),
        ("machine_learning", r"tensorflow|pytorch|scikit|ml|machine-learning"),
        ("web", r"html|css|web-dev|frontend|backend"),
    ]
    .into_iter()
    .map(|(tech, pattern)| (tech, Regex::new(pattern).unwrap()))
    .collect()
});

static RESOURCE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("tutorial", r"tutorial|guide|learn|course"),
        ("documentation", r"docs|documentation|reference|api"),
        ("questions", r"stackoverflow|how-to|what-is|why-does"),
        ("examples", r"example|demo|sample|code"),
        ("video", r"youtube.*watch|video|lecture"),
    ]
    .into_iter()
    .map(|(rtype, pattern)| (rtype, Regex::new(pattern).unwrap()))
    .collect()
});

/// Detects learning progressions: three or more visits matching the same
/// technology keyword set, in time order. An entry can contribute to
/// several technologies; its resource type is the first matching kind.
#[must_use]
pub fn find_learning_paths(entries: &[HistoryEntry]) -> Vec<LearningPath> {
    let mut tech_order: Vec<&'static str> = Vec::new();
    let mut tech_visits: BTreeMap<&'static str, Vec<(&HistoryEntry, &'static str)>> =
        BTreeMap::new();

    for entry in entries {
        let url = entry.url.to_lowercase();
        let title = entry.title.as_deref().unwrap_or("").to_lowercase();
        for (tech, pattern) in TECH_PATTERNS.iter() {
            if pattern.is_match(&url) || pattern.is_match(&title) {
                let resource_type = RESOURCE_PATTERNS
                    .iter()
                    .find(|(_, rpattern)| rpattern.is_match(&url))
                    .map_or("general", |(rtype, _)| rtype);
                if !tech_visits.contains_key(tech) {
                    tech_order.push(tech);
                }
                tech_visits.entry(tech).or_default().push((entry, resource_type));
            }
        }
    }

    let mut paths = Vec::new();
    for tech in tech_order {
        let mut visits = tech_visits.remove(tech).unwrap_or_default();
        if visits.len() < 3 {
            continue;
        }
        visits.sort_by_key(|(entry, _)| entry.last_visit_time);

        let mut resource_types: BTreeMap<String, usize> = BTreeMap::new();
        for (_, rtype) in &visits {
            *resource_types.entry((*rtype).to_string()).or_default() += 1;
        }
        paths.push(LearningPath {
            technology: tech.to_string(),
            visit_count: visits.len(),
            resource_types,
            start: visits[0].0.last_visit_time,
            end: visits[visits.len() - 1].0.last_visit_time,
            sample_resources: visits.iter().take(5).map(|(e, _)| (*e).clone()).collect(),
        });
    }
    paths
}

/// Visit-weight productivity ratios plus top sites on each side.
#[must_use]
pub fn productivity_metrics(
    categorized_data: &BTreeMap<String, CategorizedBucket>,
) -> ProductivityMetrics {
    let total_visits: u64 = categorized_data.values().map(|b| b.total_visits).sum();
    let side_visits = |categories: &[&str]| -> u64 {
        categories
            .iter()
            .filter_map(|c| categorized_data.get(*c))
            .map(|b| b.total_visits)
            .sum()
    };
    let productive_visits = side_visits(&PRODUCTIVE_CATEGORIES);
    let unproductive_visits = side_visits(&UNPRODUCTIVE_CATEGORIES);

    let top_sites = |categories: &[&str]| -> Vec<(String, usize)> {
        let mut sites = Vec::new();
        for category in categories {
            if let Some(bucket) = categorized_data.get(*category) {
                let mut domains = Counter::new();
                for entry in &bucket.entries {
                    domains.add(&entry.host());
                }
                sites.extend(domains.most_common(3));
            }
        }
        sites
    };

    #[expect(clippy::cast_precision_loss, reason = "visit counts are small")]
    let ratio = |visits: u64| -> f64 {
        if total_visits == 0 {
            0.0
        } else {
            visits as f64 / total_visits as f64
        }
    };

    ProductivityMetrics {
        productivity_ratio: ratio(productive_visits),
        distraction_ratio: ratio(unproductive_visits),
        productive_visits,
        unproductive_visits,
        total_visits,
        top_productive_sites: top_sites(&PRODUCTIVE_CATEGORIES),
        top_distraction_sites: top_sites(&UNPRODUCTIVE_CATEGORIES),
    }
}

#[expect(clippy::cast_precision_loss, reason = "session counts are small")]
fn session_rollups(sessions: &[EnrichedSession]) -> SessionRollups {
    let mut session_types: BTreeMap<String, usize> = BTreeMap::new();
    let mut time_periods: BTreeMap<String, usize> = BTreeMap::new();
    let mut rollups = SessionRollups {
        total_sessions: sessions.len(),
        ..SessionRollups::default()
    };
    for session in sessions {
        *session_types
            .entry(session.session_type.as_str().to_string())
            .or_default() += 1;
        *time_periods
            .entry(session.time_patterns.time_period.as_str().to_string())
            .or_default() += 1;
        if session.characteristics.is_productive {
            rollups.productive_sessions += 1;
        }
        if session.characteristics.is_rabbit_hole {
            rollups.rabbit_holes.push(session.clone());
        }
        if session.characteristics.is_research {
            rollups.research_sessions.push(session.clone());
        }
        if session.time_patterns.is_weekend {
            rollups.weekend_sessions += 1;
        } else {
            rollups.weekday_sessions += 1;
        }
    }
    rollups.avg_session_duration = if sessions.is_empty() {
        0.0
    } else {
        sessions.iter().map(|s| s.duration_minutes).sum::<f64>() / sessions.len() as f64
    };
    rollups.session_types = session_types;
    rollups.time_period_distribution = time_periods;
    rollups
}

const NO_SESSIONS: &str = "No sessions found";

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "durations are non-negative and small"
)]
fn describe_typical_session(sessions: &[EnrichedSession]) -> String {
    if sessions.is_empty() {
        return NO_SESSIONS.to_string();
    }
    let avg_duration =
        sessions.iter().map(|s| s.duration_minutes).sum::<f64>() / sessions.len() as f64;
    let mut types = Counter::new();
    let mut periods = Counter::new();
    for session in sessions {
        types.add(session.session_type.as_str());
        periods.add(session.time_patterns.time_period.as_str());
    }
    format!(
        "Typical session: {} minutes of {} browsing, usually during {}",
        avg_duration.round() as u64,
        types.top().unwrap_or("mixed"),
        periods.top().unwrap_or("late_night"),
    )
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "durations are non-negative and small"
)]
fn productivity_summary(sessions: &[EnrichedSession]) -> String {
    if sessions.is_empty() {
        return NO_SESSIONS.to_string();
    }
    let minutes: f64 = sessions
        .iter()
        .filter(|s| s.characteristics.productivity_ratio > 0.5)
        .map(|s| s.duration_minutes)
        .sum();
    format!(
        "Productivity summary: {} minutes of productivity",
        minutes.round() as u64
    )
}

fn describe_time_habits(sessions: &[EnrichedSession], categorizer: &Categorizer) -> String {
    if sessions.is_empty() {
        return NO_SESSIONS.to_string();
    }
    let mut habits: Vec<String> = Vec::new();
    for category in categorizer.category_names() {
        let periods: Vec<&str> = sessions
            .iter()
            .filter(|s| s.category_distribution.get(category).copied().unwrap_or(0) > 0)
            .map(|s| s.time_patterns.time_period.as_str())
            .collect();
        if !periods.is_empty() {
            habits.push(format!("{category}: {}", periods.join(", ")));
        }
    }
    format!("Time habits summary: {}", habits.join("; "))
}

fn analyze_focus_patterns(sessions: &[EnrichedSession]) -> String {
    if sessions.is_empty() {
        return NO_SESSIONS.to_string();
    }
    let mut order: Vec<&str> = Vec::new();
    let mut patterns: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for session in sessions {
        if session.characteristics.productivity_ratio > 0.5 {
            let period = session.time_patterns.time_period.as_str();
            if !patterns.contains_key(period) {
                order.push(period);
            }
            patterns
                .entry(period)
                .or_default()
                .push(format!("{}", session.duration_minutes));
        }
    }
    let parts: Vec<String> = order
        .iter()
        .map(|period| format!("{period}: {}", patterns[period].join(", ")))
        .collect();
    format!("Focus patterns summary: {}", parts.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str, title: Option<&str>, visits: u32, ts: &str) -> HistoryEntry {
        let ts: DateTime<Utc> = ts.parse().unwrap();
        HistoryEntry::new(url, title, visits, ts).unwrap()
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let categorizer = Categorizer::builtin();
        let insights = build_insights(&[], &categorizer, 2.0, DEFAULT_TOP_DOMAINS);
        assert!(insights.sessions.is_empty());
        assert_eq!(insights.session_rollups.total_sessions, 0);
        assert!((insights.session_rollups.avg_session_duration - 0.0).abs() < f64::EPSILON);
        assert!(insights.domain_stats.is_empty());
        assert!(insights.learning_paths.is_empty());
        assert_eq!(insights.productivity_metrics.total_visits, 0);
        assert!((insights.productivity_metrics.productivity_ratio - 0.0).abs() < f64::EPSILON);
        assert_eq!(insights.report_summaries.typical_session, "No sessions found");
    }

    #[test]
    fn domain_frequency_ranks_by_visit_weight() {
        let entries = vec![
            entry("https://a.com/1", Some("A1"), 2, "2026-01-05T10:00:00Z"),
            entry("https://b.com/1", Some("B1"), 9, "2026-01-05T10:01:00Z"),
            entry("https://a.com/2", Some("A2"), 3, "2026-01-05T10:02:00Z"),
        ];
        let stats = domain_frequency(&entries, 10);
        assert_eq!(stats[0].domain, "b.com");
        assert_eq!(stats[0].total_visits, 9);
        assert_eq!(stats[1].domain, "a.com");
        assert_eq!(stats[1].unique_pages, 2);
        assert_eq!(stats[1].total_visits, 5);
        assert_eq!(stats[1].sample_titles, vec!["A1", "A2"]);
    }

    #[test]
    fn domain_frequency_ties_keep_first_appearance() {
        let entries = vec![
            entry("https://first.com/1", None, 2, "2026-01-05T10:00:00Z"),
            entry("https://second.com/1", None, 2, "2026-01-05T10:01:00Z"),
        ];
        let stats = domain_frequency(&entries, 10);
        assert_eq!(stats[0].domain, "first.com");
        assert_eq!(stats[1].domain, "second.com");
    }

    #[test]
    fn domain_frequency_truncates_to_top_n() {
        let entries: Vec<HistoryEntry> = (0..5)
            .map(|i| {
                entry(
                    &format!("https://site{i}.com/"),
                    None,
                    1,
                    "2026-01-05T10:00:00Z",
                )
            })
            .collect();
        assert_eq!(domain_frequency(&entries, 3).len(), 3);
    }

    #[test]
    fn learning_path_needs_three_visits() {
        let two = vec![
            entry("https://doc.rust-lang.org/book", None, 1, "2026-01-05T10:00:00Z"),
            entry("https://rust-lang.org/learn", None, 1, "2026-01-05T11:00:00Z"),
        ];
        assert!(find_learning_paths(&two).is_empty());

        let three = vec![
            entry("https://doc.rust-lang.org/book", None, 1, "2026-01-05T10:00:00Z"),
            entry("https://rust-lang.org/learn", None, 1, "2026-01-05T11:00:00Z"),
            entry("https://blog.rust-lang.org/edition", None, 1, "2026-01-05T12:00:00Z"),
        ];
        let paths = find_learning_paths(&three);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].technology, "rust");
        assert_eq!(paths[0].visit_count, 3);
    }

    #[test]
    fn learning_path_histogram_and_time_span() {
        let entries = vec![
            entry("https://react.dev/tutorial/intro", None, 1, "2026-01-05T12:00:00Z"),
            entry("https://react.dev/docs/hooks", None, 1, "2026-01-05T10:00:00Z"),
            entry("https://nodejs.org/somepage", None, 1, "2026-01-05T11:00:00Z"),
        ];
        let paths = find_learning_paths(&entries);
        let js = paths.iter().find(|p| p.technology == "javascript").unwrap();
        assert_eq!(js.visit_count, 3);
        assert_eq!(js.resource_types.get("tutorial"), Some(&1));
        assert_eq!(js.resource_types.get("documentation"), Some(&1));
        assert_eq!(js.resource_types.get("general"), Some(&1));
        // Span reflects time order, not input order.
        assert_eq!(js.start, "2026-01-05T10:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(js.end, "2026-01-05T12:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn productivity_metrics_use_visit_weight() {
        let categorizer = Categorizer::builtin();
        let entries = vec![
            entry("https://github.com/a", None, 6, "2026-01-05T10:00:00Z"),
            entry("https://reddit.com/b", None, 3, "2026-01-05T10:01:00Z"),
            entry("https://example.org/c", None, 1, "2026-01-05T10:02:00Z"),
        ];
        let metrics = productivity_metrics(&categorizer.categorize(&entries));
        assert_eq!(metrics.total_visits, 10);
        assert_eq!(metrics.productive_visits, 6);
        assert_eq!(metrics.unproductive_visits, 3);
        assert!((metrics.productivity_ratio - 0.6).abs() < f64::EPSILON);
        assert!((metrics.distraction_ratio - 0.3).abs() < f64::EPSILON);
        assert!(metrics
            .top_productive_sites
            .contains(&("github.com".to_string(), 1)));
        assert!(metrics
            .top_distraction_sites
            .contains(&("reddit.com".to_string(), 1)));
    }

    #[test]
    fn rollups_count_sessions_and_flags() {
        let categorizer = Categorizer::builtin();
        // Two sessions separated by a long gap; the first is a rabbit hole.
        let mut entries: Vec<HistoryEntry> = (0..6)
            .map(|i| {
                entry(
                    &format!("https://reddit.com/r/x/{i}"),
                    None,
                    1,
                    &format!("2026-01-05T10:{:02}:00Z", i * 7),
                )
            })
            .collect();
        entries.push(entry("https://github.com/a", None, 1, "2026-01-05T18:00:00Z"));

        let insights = build_insights(&entries, &categorizer, 2.0, DEFAULT_TOP_DOMAINS);
        assert_eq!(insights.session_rollups.total_sessions, 2);
        assert_eq!(insights.session_rollups.rabbit_holes.len(), 1);
        assert_eq!(insights.session_rollups.productive_sessions, 1);
        assert_eq!(insights.session_rollups.weekday_sessions, 2);
        assert_eq!(insights.session_rollups.weekend_sessions, 0);
        assert_eq!(
            insights.session_rollups.session_types.values().sum::<usize>(),
            2
        );
    }

    #[test]
    fn report_summaries_mention_rounded_durations() {
        let categorizer = Categorizer::builtin();
        let entries = vec![
            entry("https://github.com/a", None, 1, "2026-01-05T10:00:00Z"),
            entry("https://github.com/b", None, 1, "2026-01-05T10:30:00Z"),
        ];
        let insights = build_insights(&entries, &categorizer, 2.0, DEFAULT_TOP_DOMAINS);
        assert_eq!(
            insights.report_summaries.typical_session,
            "Typical session: 30 minutes of highly_productive browsing, usually during morning"
        );
        assert_eq!(
            insights.report_summaries.productivity_summary,
            "Productivity summary: 30 minutes of productivity"
        );
        assert!(insights
            .report_summaries
            .time_habits
            .contains("development: morning"));
        assert!(insights
            .report_summaries
            .focus_analysis
            .contains("morning: 30"));
    }
}
