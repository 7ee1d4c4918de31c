//! WishlistBadge - the navbar counter.
//!
//! Only needs the integer, so it never asks for entries: the count comes
//! from event payloads, and the initial value may come from the cached
//! count before the first fetch.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::application::WishlistStore;
use crate::domain::wishlist::{StoreStatus, WishlistEvent};
use crate::ports::{ListenerError, Subscription, SyncListener};

#[derive(Debug, Default)]
struct BadgeState {
    count: AtomicUsize,
    refresh_requested: AtomicBool,
}

struct BadgeListener {
    state: Arc<BadgeState>,
}

impl SyncListener for BadgeListener {
    fn on_event(&self, event: &WishlistEvent) -> Result<(), ListenerError> {
        match event.total_count() {
            Some(count) => self.state.count.store(count, Ordering::SeqCst),
            None => self.state.refresh_requested.store(true, Ordering::SeqCst),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "wishlist-badge"
    }
}

/// Mounted navbar badge. Unmounts when dropped.
pub struct WishlistBadge {
    state: Arc<BadgeState>,
    subscription: Subscription,
}

impl WishlistBadge {
    /// Registers on the store's bus and seeds the count.
    ///
    /// Before the store has loaded anything, the cached count is used.
    pub fn mount(store: &WishlistStore) -> Self {
        let initial = match store.status() {
            StoreStatus::Idle => store.cached_count().unwrap_or(0),
            _ => store.count(),
        };
        let state = Arc::new(BadgeState {
            count: AtomicUsize::new(initial),
            refresh_requested: AtomicBool::new(false),
        });
        let subscription = store.subscribe(Arc::new(BadgeListener {
            state: state.clone(),
        }));

        Self {
            state,
            subscription,
        }
    }

    pub fn count(&self) -> usize {
        self.state.count.load(Ordering::SeqCst)
    }

    /// Returns true once per `ForceRefresh` received.
    pub fn take_refresh_request(&self) -> bool {
        self.state.refresh_requested.swap(false, Ordering::SeqCst)
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn unmount(&self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::SyncBus;
    use crate::adapters::session::{InMemoryCredentialStore, TracingLoginPrompt};
    use crate::adapters::storage::InMemoryCacheStorage;
    use crate::adapters::wishlist::{CallKind, MockFailure, MockWishlistApi};
    use crate::application::{WishlistCache, DEFAULT_CACHE_KEY};
    use crate::domain::foundation::{ProductId, Timestamp, UserId, WishlistEntryId};
    use crate::domain::wishlist::{WishlistEntry, WishlistSnapshot};
    use crate::ports::CacheStorage;
    use std::time::Duration;

    fn store_with(api: MockWishlistApi, storage: InMemoryCacheStorage) -> WishlistStore {
        WishlistStore::new(
            Arc::new(api),
            Arc::new(InMemoryCredentialStore::with_token("token")),
            Arc::new(TracingLoginPrompt::new()),
            WishlistCache::new(Arc::new(storage), DEFAULT_CACHE_KEY),
            Arc::new(SyncBus::new(Duration::ZERO)),
        )
    }

    #[tokio::test]
    async fn tracks_count_through_mutations() {
        let store = store_with(MockWishlistApi::new(), InMemoryCacheStorage::new());
        let badge = WishlistBadge::mount(&store);
        assert_eq!(badge.count(), 0);

        store.add(1).await.unwrap();
        store.add(2).await.unwrap();
        assert_eq!(badge.count(), 2);

        store.remove(1).await.unwrap();
        assert_eq!(badge.count(), 1);

        store.clear();
        assert_eq!(badge.count(), 0);
    }

    fn entries(products: &[i64]) -> WishlistSnapshot {
        WishlistSnapshot::from_entries(
            products
                .iter()
                .map(|&product| WishlistEntry {
                    id: WishlistEntryId::new(product),
                    user_id: UserId::new(1),
                    product_id: ProductId::new(product).unwrap(),
                    product: None,
                    added_at: Timestamp::now(),
                })
                .collect(),
        )
    }

    #[test]
    fn seeds_from_cached_count_before_first_fetch() {
        let storage = InMemoryCacheStorage::new();
        WishlistCache::new(Arc::new(storage.clone()), DEFAULT_CACHE_KEY)
            .write(&entries(&[1, 2, 3, 4]));

        let store = store_with(MockWishlistApi::new(), storage);
        let badge = WishlistBadge::mount(&store);

        assert_eq!(badge.count(), 4);
    }

    #[test]
    fn ignores_count_of_expired_record() {
        let storage = InMemoryCacheStorage::new();
        let record = serde_json::json!({
            "snapshot": [],
            "timestamp": chrono::Utc::now() - chrono::Duration::hours(5),
        });
        storage.set(DEFAULT_CACHE_KEY, &record.to_string()).unwrap();
        storage.set("wishlist_cache:count", "9").unwrap();

        let store = store_with(MockWishlistApi::new(), storage);
        let badge = WishlistBadge::mount(&store);

        assert_eq!(badge.count(), 0);
    }

    #[tokio::test]
    async fn force_refresh_sets_request_once() {
        let api = MockWishlistApi::new();
        api.fail_next(CallKind::List, MockFailure::Network("reset".into()));
        let store = store_with(api, InMemoryCacheStorage::new());
        let badge = WishlistBadge::mount(&store);

        let _ = store.add(1).await;

        assert!(badge.take_refresh_request());
        assert!(!badge.take_refresh_request());
    }

    #[tokio::test]
    async fn unmounted_badge_stops_updating() {
        let store = store_with(MockWishlistApi::new(), InMemoryCacheStorage::new());
        let badge = WishlistBadge::mount(&store);
        badge.unmount();

        store.add(1).await.unwrap();

        assert!(!badge.is_mounted());
        assert_eq!(badge.count(), 0);
    }
}
