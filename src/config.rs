use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::api::DEFAULT_BASE_URL;

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Base URL of the recipe service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Items fetched per page across all listing modes
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Quiet period before search input becomes active, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Path of the on-disk favorites store
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_url: default_base_url(),
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            timeout: default_timeout(),
            storage_path: default_storage_path(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u64 {
    20
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_timeout() -> u64 {
    30
}

fn default_storage_path() -> String {
    "favorites.json".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPES__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPES__PAGE_SIZE, RECIPES__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("RECIPES")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_upstream_service() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "https://dummyjson.com");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.timeout, 30);
        assert_eq!(config.storage_path, "favorites.json");
    }

    #[test]
    fn partial_config_keeps_remaining_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"page_size": 10}"#).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.debounce_ms, 500);
    }
}
