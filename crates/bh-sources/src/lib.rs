//! Browser history store readers.
//!
//! Each supported browser keeps its visit history in an SQLite database
//! with its own schema and timestamp epoch. The adapters in this crate
//! open those stores read-only and emit normalized
//! [`bh_core::HistoryEntry`] values on a common UTC timeline.
//!
//! The dominant real-world failure mode is a store exclusively locked by
//! a running browser; that is surfaced as [`FetchError::SourceLocked`]
//! with its remediation, never as a generic I/O error.

use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

pub mod aggregate;
pub mod chrome;
pub mod detect;
pub mod firefox;
pub mod paths;
pub mod safari;
mod store;

pub use aggregate::{fetch_all, fetch_auto, fetch_one, FetchReport, SourceFailure};
pub use detect::{detect_sources, DetectionReport};
pub use paths::SourcePaths;

/// A supported browser backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Browser {
    Firefox,
    Chrome,
    Safari,
}

impl Browser {
    /// All backends, in the order they are attempted.
    pub const ALL: [Self; 3] = [Self::Firefox, Self::Chrome, Self::Safari];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Firefox => "firefox",
            Self::Chrome => "chrome",
            Self::Safari => "safari",
        }
    }
}

impl std::fmt::Display for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Browser {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firefox" => Ok(Self::Firefox),
            "chrome" => Ok(Self::Chrome),
            "safari" => Ok(Self::Safari),
            other => Err(FetchError::InvalidArgument(format!(
                "unsupported source {other:?}, expected one of: firefox, chrome, safari"
            ))),
        }
    }
}

/// Errors reading a history store.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The backing store does not exist on disk.
    #[error("{browser} history store not found{}", path_note(.path))]
    SourceUnavailable {
        browser: Browser,
        path: Option<PathBuf>,
    },
    /// The store exists but another process holds it exclusively.
    #[error(
        "{browser} history store is locked, the browser is likely running; \
         close {browser} and retry to regain its history"
    )]
    SourceLocked { browser: Browser },
    /// The store opened but no known table shape matched.
    #[error("{browser} history store has an unrecognized schema, tables: [{}]", .tables.join(", "))]
    SchemaUnrecognized {
        browser: Browser,
        tables: Vec<String>,
    },
    /// A request parameter was rejected before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// No history store was found for any supported browser.
    #[error("no browser history stores found, install Firefox, Chrome, or Safari and retry")]
    NoSourcesFound,
    /// Every configured source failed; `reasons` names each failure.
    #[error(
        "failed to retrieve history from any source: {}; \
         history is locked while a browser is running, try closing browsers",
        format_reasons(.reasons)
    )]
    AllSourcesFailed { reasons: Vec<(Browser, String)> },
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

fn path_note(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

fn format_reasons(reasons: &[(Browser, String)]) -> String {
    reasons
        .iter()
        .map(|(browser, reason)| format!("{browser}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}
