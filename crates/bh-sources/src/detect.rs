//! Availability probing for history stores.

use serde::Serialize;
use tracing::{debug, warn};

use crate::store::{open_read_only, table_names};
use crate::{Browser, FetchError, SourcePaths};

/// What the probe found, per browser.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    /// Stores that opened and answered a query.
    pub available: Vec<Browser>,
    /// Stores held exclusively by a running browser.
    pub locked: Vec<Browser>,
    /// Browsers with no usable store on this machine.
    pub not_found: Vec<Browser>,
    pub message: String,
}

/// Probes every browser's store with a read-only open plus a trivial
/// query; a lock at either step means the browser is running.
#[must_use]
pub fn detect_sources(paths: &SourcePaths) -> DetectionReport {
    let mut available = Vec::new();
    let mut locked = Vec::new();
    let mut not_found = Vec::new();

    for browser in Browser::ALL {
        let Some(path) = paths.get(browser) else {
            not_found.push(browser);
            continue;
        };
        match open_read_only(browser, path).and_then(|conn| {
            table_names(&conn).map_err(|err| crate::store::classify(browser, path, err))
        }) {
            Ok(tables) => {
                debug!(%browser, tables = tables.len(), "store is readable");
                available.push(browser);
            }
            Err(FetchError::SourceLocked { .. }) => {
                warn!(%browser, "store is locked");
                locked.push(browser);
            }
            Err(err) => {
                warn!(%browser, error = %err, "store is unusable");
                not_found.push(browser);
            }
        }
    }

    let message = if !locked.is_empty() {
        let names = locked
            .iter()
            .copied()
            .map(Browser::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Stores for {names} are locked; close those browsers and retry to \
             make their history available."
        )
    } else if available.is_empty() {
        "No browser history stores found on this machine.".to_string()
    } else {
        let names = available
            .iter()
            .copied()
            .map(Browser::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        format!("History stores available for: {names}.")
    };

    DetectionReport {
        available,
        locked,
        not_found,
        message,
    }
}
