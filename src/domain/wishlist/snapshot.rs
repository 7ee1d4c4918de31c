//! Materialized view of the current session's wishlist.

use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

use super::WishlistEntry;
use crate::domain::foundation::{ProductId, Timestamp};

/// The store's complete copy of the wishlist at a point in time.
///
/// Fields are private so that `count == entries.len()` holds for every
/// value that can be observed. Every constructor recomputes the count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistSnapshot {
    entries: Vec<WishlistEntry>,
    count: usize,
    last_updated: Option<Timestamp>,
}

impl WishlistSnapshot {
    /// An empty snapshot that has never been updated.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            count: 0,
            last_updated: None,
        }
    }

    /// Builds a snapshot stamped with the current time.
    pub fn from_entries(entries: Vec<WishlistEntry>) -> Self {
        Self::from_entries_at(entries, Timestamp::now())
    }

    /// Builds a snapshot stamped with the given time.
    ///
    /// Duplicate product ids keep their first occurrence.
    pub fn from_entries_at(entries: Vec<WishlistEntry>, updated_at: Timestamp) -> Self {
        let mut seen = HashSet::with_capacity(entries.len());
        let total = entries.len();
        let entries: Vec<WishlistEntry> = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.product_id))
            .collect();

        if entries.len() != total {
            tracing::warn!(
                dropped = total - entries.len(),
                "Duplicate wishlist entries in server response"
            );
        }

        Self {
            count: entries.len(),
            entries,
            last_updated: Some(updated_at),
        }
    }

    /// Empty snapshot recording that it was just cleared.
    pub fn cleared() -> Self {
        Self::from_entries(Vec::new())
    }

    /// Returns a new snapshot without the given product.
    pub fn without(&self, product_id: ProductId) -> Self {
        let remaining = self
            .entries
            .iter()
            .filter(|entry| entry.product_id != product_id)
            .cloned()
            .collect();
        Self::from_entries(remaining)
    }

    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<WishlistEntry> {
        self.entries
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn last_updated(&self) -> Option<Timestamp> {
        self.last_updated
    }

    /// O(n) membership check; wishlists stay small.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.entries.iter().any(|entry| entry.product_id == product_id)
    }

    pub fn product_ids(&self) -> Vec<ProductId> {
        self.entries.iter().map(|entry| entry.product_id).collect()
    }

    /// True when the last mutation happened within `window`.
    pub fn is_recently_updated(&self, window: Duration) -> bool {
        self.last_updated
            .map(|ts| ts.is_within(window))
            .unwrap_or(false)
    }

    /// Compares entries only, ignoring when each snapshot was taken.
    pub fn same_entries(&self, other: &WishlistSnapshot) -> bool {
        self.entries == other.entries
    }
}

impl Default for WishlistSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
