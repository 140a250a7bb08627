//! Configuration management for the Bodega admin client
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with BODEGA_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Default API root, matching the server's development setup
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api/";

/// Main client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Inventory API connection
    pub api: ApiConfig,

    /// Sub-location browsing behaviour
    pub navigation: NavigationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Root URL of the REST API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Bearer token issued by the login flow, if already known
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NavigationConfig {
    /// List deactivated sub-locations alongside active ones
    pub include_inactive: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("BODEGA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("api.base_url", DEFAULT_API_BASE_URL)?
            .set_default("api.timeout_secs", 10)?
            .set_default("navigation.include_inactive", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BODEGA__API__BASE_URL, ...)
            .add_source(
                Environment::with_prefix("BODEGA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 10,
            token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_sources() {
        let config = Config::load().unwrap();

        assert!(!config.environment.is_empty());
        assert!(config.api.timeout_secs > 0);
        assert!(config.api.base_url.starts_with("http"));
    }

    #[test]
    fn test_api_config_default() {
        let api = ApiConfig::default();
        assert_eq!(api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(api.timeout_secs, 10);
        assert!(api.token.is_none());
    }
}
