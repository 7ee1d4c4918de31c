//! Synchronization bus configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_DEBOUNCE_MS: u64 = 5_000;

/// Debounce window for change notifications
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Coalescing window in milliseconds; 0 delivers every event synchronously
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,
}

impl SyncConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ValidationError::InvalidDebounce);
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
        }
    }
}

fn default_debounce() -> u64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_config_defaults() {
        assert_eq!(SyncConfig::default().debounce(), Duration::from_millis(100));
    }

    #[test]
    fn test_zero_debounce_is_valid() {
        let config = SyncConfig { debounce_ms: 0 };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_debounce_too_long() {
        let config = SyncConfig { debounce_ms: 5_001 };
        assert_eq!(config.validate(), Err(ValidationError::InvalidDebounce));
    }
}
