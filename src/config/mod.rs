//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AUTO_COMPASS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use auto_compass::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Store at {}", config.store.base_url);
//! ```

mod cache;
mod catalog;
mod display;
mod error;
mod log;
mod store;

pub use cache::CacheConfig;
pub use catalog::CatalogConfig;
pub use display::DisplayConfig;
pub use error::{ConfigError, ValidationError};
pub use log::LogConfig;
pub use store::StoreConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// development setup against a local store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Remote store connection
    #[serde(default)]
    pub store: StoreConfig,

    /// Price formatting on result cards
    #[serde(default)]
    pub display: DisplayConfig,

    /// Local cache file
    #[serde(default)]
    pub cache: CacheConfig,

    /// Option catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging output
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AUTO_COMPASS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `AUTO_COMPASS__STORE__BASE_URL=https://...` -> `store.base_url = ...`
    /// - `AUTO_COMPASS__LOG__JSON=true` -> `log.json = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AUTO_COMPASS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.store.validate()?;
        self.display.validate()?;
        self.cache.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use std::time::Duration;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 5] = [
        "AUTO_COMPASS__STORE__BASE_URL",
        "AUTO_COMPASS__STORE__TIMEOUT_SECS",
        "AUTO_COMPASS__STORE__SESSION_COOKIE",
        "AUTO_COMPASS__DISPLAY__CURRENCY_SYMBOL",
        "AUTO_COMPASS__LOG__JSON",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.store.base_url, "http://localhost:5000");
        assert!(!config.log.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("AUTO_COMPASS__STORE__BASE_URL", "https://cars.example.com");
        env::set_var("AUTO_COMPASS__STORE__TIMEOUT_SECS", "3");
        env::set_var("AUTO_COMPASS__STORE__SESSION_COOKIE", "session=abc");
        env::set_var("AUTO_COMPASS__DISPLAY__CURRENCY_SYMBOL", "Q");
        env::set_var("AUTO_COMPASS__LOG__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.store.base_url, "https://cars.example.com");
        assert_eq!(config.store.timeout(), Duration::from_secs(3));
        assert!(config.store.session_cookie.is_some());
        assert_eq!(config.display.currency_symbol, "Q");
        assert!(config.log.json);
    }

    #[test]
    fn test_validate_reports_bad_store_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("AUTO_COMPASS__STORE__BASE_URL", "ftp://cars.example.com");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.validate(), Err(ValidationError::InvalidStoreUrl));
    }
}
