//! In-Memory Cache Storage Adapter
//!
//! Session-scoped: lives exactly as long as the process (or the value).
//! Useful for tests and for hosts without a writable disk.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::ports::{CacheStorage, CacheStorageError};

/// In-memory key/value storage for the wishlist cache
#[derive(Debug, Clone, Default)]
pub struct InMemoryCacheStorage {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryCacheStorage {
    /// Create a new, empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a key is present (useful for tests)
    pub fn contains(&self, key: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl CacheStorage for InMemoryCacheStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CacheStorageError> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheStorageError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheStorageError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}
