//! Core analytics for browser history.
//!
//! This crate contains the in-memory pipeline stages:
//! - Categorization: rule-based URL classification with subcategories
//! - Segmentation: clustering time-ordered visits into sessions
//! - Enrichment: per-session focus, productivity, and pattern metrics
//! - Insights: report-ready rollups over enriched sessions
//!
//! All stages are pure functions over normalized [`HistoryEntry`] values;
//! reading browser stores lives in `bh-sources`.

pub mod cache;
pub mod categories;
pub mod categorize;
mod counter;
pub mod enrich;
pub mod entry;
pub mod insights;
pub mod search;
pub mod segment;

pub use cache::{CacheKey, CacheMetadata, HistoryCache};
pub use categories::{CategoryConfig, CategoryRule, SubcategoryRule};
pub use categorize::{CategorizedBucket, Categorizer, CategoryMatch, RuleError};
pub use enrich::{enrich_session, EnrichedSession, SessionKind, TimePeriod};
pub use entry::HistoryEntry;
pub use insights::{build_insights, BrowsingInsights};
pub use search::search_entries;
pub use segment::segment_entries;
