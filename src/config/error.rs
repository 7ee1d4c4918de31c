//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("API base URL must start with http:// or https://")]
    InvalidApiUrl,

    #[error("API timeout must be between 1 and 120 seconds")]
    InvalidTimeout,

    #[error("Cache key must not be empty")]
    InvalidCacheKey,

    #[error("Cache TTL must be greater than zero")]
    InvalidCacheTtl,

    #[error("Debounce window must not exceed 5000 ms")]
    InvalidDebounce,

    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}
