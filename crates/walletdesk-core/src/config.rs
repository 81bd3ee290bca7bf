//! Settings resolution for walletdesk.
//!
//! Implements hierarchical settings resolution:
//! 1. Built-in defaults
//! 2. Global settings (~/.config/walletdesk/settings.json)
//! 3. Environment variables
//! 4. CLI arguments (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default admin API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Complete walletdesk settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

/// Admin API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiSettings {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where the admin session cookies live.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionSettings {
    /// Cookie jar file. `None` means the platform data directory.
    pub cookie_file: Option<PathBuf>,
}

impl SessionSettings {
    /// Resolved cookie jar path.
    pub fn cookie_path(&self) -> Option<PathBuf> {
        self.cookie_file.clone().or_else(default_cookie_path)
    }
}

/// Page sizes used by the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Rows per page on the order list.
    pub orders_page_size: u32,
    /// Rows fetched for the dashboard.
    pub dashboard_page_size: u32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            orders_page_size: 20,
            dashboard_page_size: 10,
        }
    }
}

/// Load settings with hierarchical resolution.
pub fn load_settings() -> Result<Settings> {
    let mut settings = Settings::default();

    if let Some(global_path) = global_settings_path() {
        if global_path.exists() {
            settings = load_settings_file(&global_path)?;
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    Ok(settings)
}

/// Get the global settings file path.
pub fn global_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("walletdesk").join("settings.json"))
}

/// Directory for walletdesk state (cookies, logs).
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("walletdesk"))
}

/// Default cookie jar location.
pub fn default_cookie_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("cookies.json"))
}

/// Default TUI log file location.
pub fn default_log_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("walletdesk.log"))
}

pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read settings file {}: {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse settings file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Apply `WALLETDESK_*` overrides read through `lookup`.
pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("WALLETDESK_API_URL") {
        if !val.trim().is_empty() {
            settings.api.base_url = val;
        }
    }
    if let Some(val) = lookup("WALLETDESK_TIMEOUT_SECS") {
        if let Ok(n) = val.parse() {
            settings.api.timeout_secs = n;
        }
    }
    if let Some(val) = lookup("WALLETDESK_COOKIE_FILE") {
        settings.session.cookie_file = Some(PathBuf::from(val));
    }
    if let Some(val) = lookup("WALLETDESK_PAGE_SIZE") {
        if let Ok(n) = val.parse::<u32>() {
            if n > 0 {
                settings.ui.orders_page_size = n;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_settings_point_at_local_api() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, "http://localhost:3000/api");
        assert_eq!(settings.ui.orders_page_size, 20);
        assert_eq!(settings.ui.dashboard_page_size, 10);
    }

    #[test]
    fn env_overrides_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"api":{"base_url":"https://file.example/api","timeout_secs":5}}"#,
        )
        .unwrap();

        let mut settings = load_settings_file(&path).unwrap();
        assert_eq!(settings.api.base_url, "https://file.example/api");
        assert_eq!(settings.api.timeout_secs, 5);

        apply_env_overrides(
            &mut settings,
            lookup_from(&[("WALLETDESK_API_URL", "https://env.example/api")]),
        );
        assert_eq!(settings.api.base_url, "https://env.example/api");
        assert_eq!(settings.api.timeout_secs, 5);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"ui":{"orders_page_size":50}}"#).unwrap();

        let settings = load_settings_file(&path).unwrap();
        assert_eq!(settings.ui.orders_page_size, 50);
        assert_eq!(settings.ui.dashboard_page_size, 10);
        assert_eq!(settings.api.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn invalid_numbers_are_ignored() {
        let mut settings = Settings::default();
        apply_env_overrides(
            &mut settings,
            lookup_from(&[
                ("WALLETDESK_TIMEOUT_SECS", "soon"),
                ("WALLETDESK_PAGE_SIZE", "0"),
                ("WALLETDESK_API_URL", "  "),
            ]),
        );
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.ui.orders_page_size, 20);
        assert_eq!(settings.api.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn cookie_file_override_wins() {
        let mut settings = Settings::default();
        apply_env_overrides(
            &mut settings,
            lookup_from(&[("WALLETDESK_COOKIE_FILE", "/tmp/jar.json")]),
        );
        assert_eq!(
            settings.session.cookie_path().unwrap(),
            PathBuf::from("/tmp/jar.json")
        );
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_settings_file(&path), Err(Error::Config(_))));
    }
}
