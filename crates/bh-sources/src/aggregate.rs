//! Fan-out across all configured history stores.
//!
//! Every source is attempted independently; one locked or missing store
//! never hides the others. Partial success is a first-class outcome and
//! the failure ledger rides along with the merged entries.

use std::path::Path;

use bh_core::HistoryEntry;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::store::ensure_positive_days;
use crate::{chrome, detect, firefox, safari, Browser, FetchError, SourcePaths};

/// One source that failed, with its classified reason.
#[derive(Debug, Clone, Serialize)]
pub struct SourceFailure {
    pub browser: Browser,
    pub reason: String,
    pub locked: bool,
}

/// Merged entries plus the per-source ledger.
#[derive(Debug, Serialize)]
pub struct FetchReport {
    pub entries: Vec<HistoryEntry>,
    pub succeeded: Vec<Browser>,
    pub failed: Vec<SourceFailure>,
    pub total_entries: usize,
    pub recommendation: String,
}

/// Fetches from every configured source, merging what succeeds.
///
/// Fails only when no source is configured or every source fails; the
/// latter carries each per-source reason.
pub fn fetch_all(paths: &SourcePaths, days: u32) -> Result<FetchReport, FetchError> {
    fetch_all_at(paths, days, Utc::now())
}

pub fn fetch_all_at(
    paths: &SourcePaths,
    days: u32,
    now: DateTime<Utc>,
) -> Result<FetchReport, FetchError> {
    ensure_positive_days(days)?;
    let configured = paths.configured();
    if configured.is_empty() {
        return Err(FetchError::NoSourcesFound);
    }

    let outcomes: Vec<(Browser, Result<Vec<HistoryEntry>, FetchError>)> = configured
        .par_iter()
        .map(|(browser, path)| (*browser, fetch_source(*browser, path, days, now)))
        .collect();

    let mut entries = Vec::new();
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    for (browser, outcome) in outcomes {
        match outcome {
            Ok(source_entries) => {
                info!(%browser, count = source_entries.len(), days, "fetched history");
                entries.extend(source_entries);
                succeeded.push(browser);
            }
            Err(err) => {
                warn!(%browser, error = %err, "source failed");
                failed.push(SourceFailure {
                    browser,
                    locked: matches!(err, FetchError::SourceLocked { .. }),
                    reason: err.to_string(),
                });
            }
        }
    }

    if succeeded.is_empty() {
        return Err(FetchError::AllSourcesFailed {
            reasons: failed.into_iter().map(|f| (f.browser, f.reason)).collect(),
        });
    }

    let recommendation = recommendation(&entries, &succeeded, &failed);
    Ok(FetchReport {
        total_entries: entries.len(),
        entries,
        succeeded,
        failed,
        recommendation,
    })
}

/// Fetches from one named source.
pub fn fetch_one(
    paths: &SourcePaths,
    browser: Browser,
    days: u32,
) -> Result<Vec<HistoryEntry>, FetchError> {
    fetch_one_at(paths, browser, days, Utc::now())
}

pub fn fetch_one_at(
    paths: &SourcePaths,
    browser: Browser,
    days: u32,
    now: DateTime<Utc>,
) -> Result<Vec<HistoryEntry>, FetchError> {
    ensure_positive_days(days)?;
    let path = paths
        .get(browser)
        .ok_or(FetchError::SourceUnavailable {
            browser,
            path: None,
        })?;
    fetch_source(browser, path, days, now)
}

/// Fetches from the first source the detection probe reports available,
/// returning which one was picked.
pub fn fetch_auto(
    paths: &SourcePaths,
    days: u32,
) -> Result<(Browser, Vec<HistoryEntry>), FetchError> {
    fetch_auto_at(paths, days, Utc::now())
}

pub fn fetch_auto_at(
    paths: &SourcePaths,
    days: u32,
    now: DateTime<Utc>,
) -> Result<(Browser, Vec<HistoryEntry>), FetchError> {
    ensure_positive_days(days)?;
    let report = detect::detect_sources(paths);
    let browser = report
        .available
        .first()
        .copied()
        .ok_or(FetchError::NoSourcesFound)?;
    info!(%browser, "auto-detected source");
    Ok((browser, fetch_one_at(paths, browser, days, now)?))
}

fn fetch_source(
    browser: Browser,
    path: &Path,
    days: u32,
    now: DateTime<Utc>,
) -> Result<Vec<HistoryEntry>, FetchError> {
    match browser {
        Browser::Firefox => firefox::fetch_at(path, days, now),
        Browser::Chrome => chrome::fetch_at(path, days, now),
        Browser::Safari => safari::fetch_at(path, days, now),
    }
}

fn recommendation(
    entries: &[HistoryEntry],
    succeeded: &[Browser],
    failed: &[SourceFailure],
) -> String {
    let names = |browsers: &[Browser]| {
        browsers
            .iter()
            .copied()
            .map(Browser::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    if failed.is_empty() {
        return format!(
            "Successfully retrieved {} entries from all sources.",
            entries.len()
        );
    }
    let locked: Vec<Browser> = failed.iter().filter(|f| f.locked).map(|f| f.browser).collect();
    let mut message = String::new();
    if !locked.is_empty() {
        message.push_str(&format!(
            "Some browsers ({}) are currently open and their stores are locked. \
             Close them and retry to get complete history. ",
            names(&locked)
        ));
    }
    message.push_str(&format!(
        "Successfully retrieved {} entries from {}.",
        entries.len(),
        names(succeeded)
    ));
    message
}
