//! Local cache configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Cache key, freshness window and optional on-disk location
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_key")]
    pub key: String,

    /// Maximum age of a cached snapshot, in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Directory for file-backed caching; in-memory when unset
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key.trim().is_empty() {
            return Err(ValidationError::InvalidCacheKey);
        }
        if self.ttl_secs == 0 {
            return Err(ValidationError::InvalidCacheTtl);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            ttl_secs: default_ttl(),
            dir: None,
        }
    }
}

fn default_key() -> String {
    "wishlist_cache".to_string()
}

fn default_ttl() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.key, "wishlist_cache");
        assert_eq!(config.ttl(), Duration::from_secs(300));
        assert!(config.dir.is_none());
    }

    #[test]
    fn test_validation_empty_key() {
        let config = CacheConfig {
            key: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCacheKey));
    }

    #[test]
    fn test_validation_zero_ttl() {
        let config = CacheConfig {
            ttl_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCacheTtl));
    }
}
