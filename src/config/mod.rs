//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `BETTA_WISHLIST` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use betta_wishlist::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Wishlist API at {}", config.api.base_url);
//! ```

mod api;
mod cache;
mod error;
mod logging;
mod session;
mod sync;

pub use api::ApiConfig;
pub use cache::CacheConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use session::SessionConfig;
pub use sync::SyncConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// (signed-out) configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Wishlist server location and timeout
    #[serde(default)]
    pub api: ApiConfig,

    /// Local TTL cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Change notification debounce
    #[serde(default)]
    pub sync: SyncConfig,

    /// Access credential
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `BETTA_WISHLIST` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `BETTA_WISHLIST__API__BASE_URL=https://...` -> `api.base_url`
    /// - `BETTA_WISHLIST__CACHE__TTL_SECS=60` -> `cache.ttl_secs = 60`
    /// - `BETTA_WISHLIST__SESSION__ACCESS_TOKEN=...` -> `session.access_token`
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
                    .prefix("BETTA_WISHLIST")
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
        self.api.validate()?;
        self.cache.validate()?;
        self.sync.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Loads and validates in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }
}
