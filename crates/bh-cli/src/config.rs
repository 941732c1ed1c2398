//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::Context;
use bh_core::{categories::CategoryConfig, Categorizer};
use bh_sources::{Browser, SourcePaths};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Day window used when a command does not pass `--days`.
    pub default_days: u32,
    /// Inactivity gap, in hours, that closes a session.
    pub max_gap_hours: f64,
    /// Domains kept in the insight frequency table.
    pub top_domains: usize,
    /// Optional JSON file replacing the built-in category rules.
    pub categories_path: Option<PathBuf>,
    /// Explicit history store locations, overriding discovery.
    pub firefox_path: Option<PathBuf>,
    pub chrome_path: Option<PathBuf>,
    pub safari_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_days: 7,
            max_gap_hours: bh_core::segment::DEFAULT_MAX_GAP_HOURS,
            top_domains: bh_core::insights::DEFAULT_TOP_DOMAINS,
            categories_path: None,
            firefox_path: None,
            chrome_path: None,
            safari_path: None,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("BH_"));

        figment.extract()
    }

    /// Discovered store locations with any configured overrides applied.
    #[must_use]
    pub fn source_paths(&self) -> SourcePaths {
        let mut paths = SourcePaths::discover();
        for (browser, overridden) in [
            (Browser::Firefox, &self.firefox_path),
            (Browser::Chrome, &self.chrome_path),
            (Browser::Safari, &self.safari_path),
        ] {
            if let Some(path) = overridden {
                paths = paths.with_override(browser, path.clone());
            }
        }
        paths
    }

    /// Categorizer from `categories_path`, or the built-in rule table.
    pub fn categorizer(&self) -> anyhow::Result<Categorizer> {
        match &self.categories_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let config: CategoryConfig = serde_json::from_str(&raw)
                    .with_context(|| format!("invalid category rules in {}", path.display()))?;
                Ok(Categorizer::new(&config)?)
            }
            None => Ok(Categorizer::builtin()),
        }
    }
}

/// Returns the platform-specific config directory for bh.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("bh"))
}
