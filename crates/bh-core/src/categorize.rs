//! Rule-based URL categorization.
//!
//! Precedence is part of the contract: categories are scanned in configured
//! order, domain substrings before URL patterns within each category, and
//! the first match wins at every level. Entries nothing matched land in the
//! implicit `other` bucket.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::categories::{CategoryConfig, SubcategoryRule, OTHER_CATEGORY};
use crate::entry::{host_of, HistoryEntry};

/// Errors building a categorizer from a rule table.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A URL pattern failed to compile.
    #[error("invalid pattern {pattern:?} in category {category}: {source}")]
    InvalidPattern {
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// The category (and optional subcategory) resolved for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMatch {
    pub category: String,
    pub subcategory: Option<String>,
}

#[derive(Debug)]
struct CompiledCategory {
    name: String,
    domains: Vec<String>,
    patterns: Vec<Regex>,
    subcategories: Vec<SubcategoryRule>,
}

/// Per-category aggregation of matched entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategorizedBucket {
    pub entries: Vec<HistoryEntry>,
    pub subcategories: BTreeMap<String, Vec<HistoryEntry>>,
    pub count: usize,
    pub unique_domains: BTreeSet<String>,
    pub total_visits: u64,
}

impl CategorizedBucket {
    fn push(&mut self, entry: &HistoryEntry, subcategory: Option<&str>) {
        self.count += 1;
        self.unique_domains.insert(entry.host());
        self.total_visits += entry.visit_weight();
        if let Some(sub) = subcategory {
            self.subcategories
                .entry(sub.to_string())
                .or_default()
                .push(entry.clone());
        }
        self.entries.push(entry.clone());
    }
}

/// Classifies entries against an immutable, injected rule table.
#[derive(Debug)]
pub struct Categorizer {
    categories: Vec<CompiledCategory>,
}

impl Categorizer {
    /// Compiles a rule table. Patterns are compiled once here.
    pub fn new(config: &CategoryConfig) -> Result<Self, RuleError> {
        let mut categories = Vec::with_capacity(config.categories.len());
        for rule in &config.categories {
            let mut patterns = Vec::with_capacity(rule.patterns.len());
            for pattern in &rule.patterns {
                let compiled = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
                    category: rule.name.clone(),
                    pattern: pattern.clone(),
                    source,
                })?;
                patterns.push(compiled);
            }
            categories.push(CompiledCategory {
                name: rule.name.clone(),
                domains: rule.domains.clone(),
                patterns,
                subcategories: rule.subcategories.clone(),
            });
        }
        Ok(Self { categories })
    }

    /// Categorizer over the built-in rule table.
    ///
    /// The built-in patterns are known-good, so this cannot fail.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(&CategoryConfig::builtin()).unwrap_or_else(|e| {
            unreachable!("builtin rule table failed to compile: {e}");
        })
    }

    /// Category names in configured order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Resolves the category for a single URL, or `None` when no rule
    /// matches (the entry belongs in `other`).
    #[must_use]
    pub fn match_url(&self, url: &str) -> Option<CategoryMatch> {
        let url = url.to_lowercase();
        let host = host_of(&url);
        for category in &self.categories {
            if category.domains.iter().any(|d| host.contains(d.as_str()))
                || category.patterns.iter().any(|p| p.is_match(&url))
            {
                return Some(CategoryMatch {
                    category: category.name.clone(),
                    subcategory: subcategory_for(&category.subcategories, &host),
                });
            }
        }
        None
    }

    /// Per-URL lookup used by session enrichment.
    #[must_use]
    pub fn lookup(&self, entries: &[HistoryEntry]) -> HashMap<String, CategoryMatch> {
        let mut lookup = HashMap::new();
        for entry in entries {
            if let Some(matched) = self.match_url(&entry.url) {
                lookup.insert(entry.url.clone(), matched);
            }
        }
        lookup
    }

    /// Buckets every entry into exactly one category, `other` included.
    #[must_use]
    pub fn categorize(&self, entries: &[HistoryEntry]) -> BTreeMap<String, CategorizedBucket> {
        let mut buckets: BTreeMap<String, CategorizedBucket> = BTreeMap::new();
        let mut uncategorized = CategorizedBucket::default();
        for entry in entries {
            match self.match_url(&entry.url) {
                Some(matched) => {
                    buckets
                        .entry(matched.category)
                        .or_default()
                        .push(entry, matched.subcategory.as_deref());
                }
                None => uncategorized.push(entry, None),
            }
        }
        if uncategorized.count > 0 {
            buckets.insert(OTHER_CATEGORY.to_string(), uncategorized);
        }
        buckets
    }
}

/// First subcategory whose host list contains a substring of `host`.
fn subcategory_for(subcategories: &[SubcategoryRule], host: &str) -> Option<String> {
    subcategories
        .iter()
        .find(|sub| sub.hosts.iter().any(|h| host.contains(h.as_str())))
        .map(|sub| sub.name.clone())
}
