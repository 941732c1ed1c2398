//! History store discovery.
//!
//! Per-platform default locations, each overridable from configuration.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Browser;

/// Resolved history store locations, one optional path per browser.
#[derive(Debug, Clone, Default)]
pub struct SourcePaths {
    firefox: Option<PathBuf>,
    chrome: Option<PathBuf>,
    safari: Option<PathBuf>,
}

impl SourcePaths {
    /// Discovers stores in their platform-default locations.
    #[must_use]
    pub fn discover() -> Self {
        Self {
            firefox: firefox_history_path(),
            chrome: chrome_history_path(),
            safari: safari_history_path(),
        }
    }

    /// Replaces a discovered path with an explicit one.
    #[must_use]
    pub fn with_override(mut self, browser: Browser, path: PathBuf) -> Self {
        match browser {
            Browser::Firefox => self.firefox = Some(path),
            Browser::Chrome => self.chrome = Some(path),
            Browser::Safari => self.safari = Some(path),
        }
        self
    }

    #[must_use]
    pub fn get(&self, browser: Browser) -> Option<&Path> {
        match browser {
            Browser::Firefox => self.firefox.as_deref(),
            Browser::Chrome => self.chrome.as_deref(),
            Browser::Safari => self.safari.as_deref(),
        }
    }

    /// Browsers with a resolved path, in attempt order.
    #[must_use]
    pub fn configured(&self) -> Vec<(Browser, &Path)> {
        Browser::ALL
            .into_iter()
            .filter_map(|browser| self.get(browser).map(|path| (browser, path)))
            .collect()
    }
}

/// Firefox keeps one `places.sqlite` per profile; the default profile
/// directory ends in `.default-release` (newer) or `.default`.
#[must_use]
pub fn firefox_history_path() -> Option<PathBuf> {
    let base = match std::env::consts::OS {
        "macos" => dirs::home_dir()?.join("Library/Application Support/Firefox/Profiles"),
        "linux" => dirs::home_dir()?.join(".mozilla/firefox"),
        "windows" => dirs::config_dir()?.join("Mozilla").join("Firefox").join("Profiles"),
        _ => return None,
    };
    let profile = find_profile_dir(&base, ".default-release")
        .or_else(|| find_profile_dir(&base, ".default"))?;
    existing(profile.join("places.sqlite"))
}

#[must_use]
pub fn chrome_history_path() -> Option<PathBuf> {
    let base = match std::env::consts::OS {
        "macos" => dirs::home_dir()?.join("Library/Application Support/Google/Chrome"),
        "linux" => dirs::home_dir()?.join(".config/google-chrome"),
        "windows" => dirs::data_local_dir()?
            .join("Google")
            .join("Chrome")
            .join("User Data"),
        _ => return None,
    };
    existing(base.join("Default").join("History"))
}

/// Safari only exists on macOS; modern versions sync history through
/// CloudKit, so only the on-disk `History.db` locations are checked.
#[must_use]
pub fn safari_history_path() -> Option<PathBuf> {
    if std::env::consts::OS != "macos" {
        return None;
    }
    let home = dirs::home_dir()?;
    [
        home.join("Library/Safari/History.db"),
        home.join("Library/WebKit/com.apple.Safari/History.db"),
    ]
    .into_iter()
    .find(|p| p.exists())
}

fn find_profile_dir(base: &Path, suffix: &str) -> Option<PathBuf> {
    let read = std::fs::read_dir(base).ok()?;
    for dir_entry in read.flatten() {
        let path = dir_entry.path();
        if path.is_dir()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(suffix))
        {
            debug!(path = %path.display(), "found firefox profile");
            return Some(path);
        }
    }
    None
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_discovery() {
        let paths = SourcePaths::default()
            .with_override(Browser::Firefox, PathBuf::from("/tmp/places.sqlite"));
        assert_eq!(
            paths.get(Browser::Firefox),
            Some(Path::new("/tmp/places.sqlite"))
        );
        assert!(paths.get(Browser::Chrome).is_none());
    }

    #[test]
    fn configured_follows_attempt_order() {
        let paths = SourcePaths::default()
            .with_override(Browser::Safari, PathBuf::from("/tmp/History.db"))
            .with_override(Browser::Firefox, PathBuf::from("/tmp/places.sqlite"));
        let configured = paths.configured();
        assert_eq!(configured.len(), 2);
        assert_eq!(configured[0].0, Browser::Firefox);
        assert_eq!(configured[1].0, Browser::Safari);
    }

    #[test]
    fn firefox_profile_suffix_matching() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("abcd1234.default-release")).unwrap();
        std::fs::create_dir(dir.path().join("unrelated")).unwrap();
        let found = find_profile_dir(dir.path(), ".default-release").unwrap();
        assert!(found.ends_with("abcd1234.default-release"));
        assert!(find_profile_dir(dir.path(), ".default-esr").is_none());
    }
}
