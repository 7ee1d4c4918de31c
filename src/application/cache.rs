//! WishlistCache - time-bounded local copy of the last known snapshot.
//!
//! The cache is an optimization only. Every storage failure is logged and
//! degraded to a miss; nothing here ever returns an error to the caller.
//!
//! Layout under the configured key:
//!
//! ```text
//! <key>        {"snapshot": [WishlistEntry...], "timestamp": "<rfc3339>"}
//! <key>:count  "<entries.len()>"
//! ```
//!
//! The count is only trusted while the record beside it is fresh.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::Timestamp;
use crate::domain::wishlist::{WishlistEntry, WishlistSnapshot};
use crate::ports::CacheStorage;

/// Default cache key.
pub const DEFAULT_CACHE_KEY: &str = "wishlist_cache";

/// Default freshness window (5 minutes).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(300);

/// Persisted cache record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub snapshot: Vec<WishlistEntry>,
    pub timestamp: Timestamp,
}

impl CacheRecord {
    /// Rebuilds the snapshot, stamped with the time it was cached.
    pub fn into_snapshot(self) -> WishlistSnapshot {
        WishlistSnapshot::from_entries_at(self.snapshot, self.timestamp)
    }
}

/// Fail-open cache over a [`CacheStorage`].
pub struct WishlistCache {
    storage: Arc<dyn CacheStorage>,
    key: String,
    count_key: String,
    max_age: Duration,
}

impl WishlistCache {
    pub fn new(storage: Arc<dyn CacheStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            count_key: format!("{}:count", key),
            storage,
            key,
            max_age: DEFAULT_MAX_AGE,
        }
    }

    /// Sets the window used by [`read_fresh`](Self::read_fresh).
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Persists the snapshot with the current time, replacing any prior record.
    pub fn write(&self, snapshot: &WishlistSnapshot) {
        let record = CacheRecord {
            snapshot: snapshot.entries().to_vec(),
            timestamp: Timestamp::now(),
        };

        let payload = match serde_json::to_string(&record) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize wishlist cache record");
                return;
            }
        };

        // A failed write must not leave an older, still-fresh record behind.
        if let Err(e) = self.storage.set(&self.key, &payload) {
            tracing::warn!(key = %self.key, error = %e, "Wishlist cache write failed");
            self.clear();
            return;
        }
        if let Err(e) = self
            .storage
            .set(&self.count_key, &snapshot.count().to_string())
        {
            tracing::warn!(key = %self.count_key, error = %e, "Wishlist count write failed");
            self.clear();
            return;
        }

        tracing::debug!(count = snapshot.count(), "Wishlist cached");
    }

    /// Returns the stored record if it is at most `max_age` old.
    ///
    /// Expired, future-dated and unparseable records are removed and
    /// reported as absent.
    pub fn read(&self, max_age: Duration) -> Option<CacheRecord> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("Wishlist cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Wishlist cache read failed");
                return None;
            }
        };

        let record: CacheRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable wishlist cache record");
                self.clear();
                return None;
            }
        };

        match record.timestamp.age() {
            Some(age) if age <= max_age => {
                tracing::debug!(age_ms = age.as_millis() as u64, "Wishlist cache hit");
                Some(record)
            }
            Some(age) => {
                tracing::debug!(age_ms = age.as_millis() as u64, "Wishlist cache expired");
                self.clear();
                None
            }
            None => {
                tracing::warn!("Discarding future-dated wishlist cache record");
                self.clear();
                None
            }
        }
    }

    /// [`read`](Self::read) with the configured window.
    pub fn read_fresh(&self) -> Option<CacheRecord> {
        self.read(self.max_age)
    }

    /// Removes the record and its derived count.
    pub fn clear(&self) {
        for key in [&self.key, &self.count_key] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key = %key, error = %e, "Wishlist cache clear failed");
            }
        }
    }

    /// Cached entry count, for consumers that only need the integer.
    ///
    /// Follows the record's freshness: no fresh record, no count.
    pub fn cached_count(&self) -> Option<usize> {
        let record = self.read_fresh()?;
        let stored = match self.storage.get(&self.count_key) {
            Ok(value) => value.and_then(|v| v.trim().parse().ok()),
            Err(e) => {
                tracing::warn!(key = %self.count_key, error = %e, "Wishlist count read failed");
                None
            }
        };
        Some(stored.unwrap_or(record.snapshot.len()))
    }
}
