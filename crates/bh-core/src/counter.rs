//! Frequency counting that preserves first-seen order.
//!
//! Ranking ties are broken by insertion order, which downstream contracts
//! (dominant category, top domains) depend on.

use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub(crate) struct Counter {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl Counter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, key: &str) {
        self.add_many(key, 1);
    }

    pub(crate) fn add_many(&mut self, key: &str, n: usize) {
        if let Some(count) = self.counts.get_mut(key) {
            *count += n;
        } else {
            self.order.push(key.to_string());
            self.counts.insert(key.to_string(), n);
        }
    }

    pub(crate) fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Keys in first-seen order with their counts.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.order.iter().map(|k| (k.as_str(), self.counts[k]))
    }

    /// The `n` highest counts, descending; ties keep first-seen order.
    pub(crate) fn most_common(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<(String, usize)> = self
            .order
            .iter()
            .map(|k| (k.clone(), self.counts[k]))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// The single most common key, if any.
    pub(crate) fn top(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (key, count) in self.iter() {
            match best {
                Some((_, c)) if c >= count => {}
                _ => best = Some((key, count)),
            }
        }
        best.map(|(k, _)| k)
    }
}
