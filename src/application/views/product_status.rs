//! ProductWishlistStatus - "is this one product wishlisted" for a product tile.

use std::sync::{Arc, Weak};

use crate::application::{ToggleOutcome, WishlistStore};
use crate::domain::foundation::ProductId;
use crate::domain::wishlist::WishlistError;
use crate::ports::{listener_fn, Subscription};

/// Membership and loading flags for a single product.
///
/// Every answer is read from the store at call time. The optional bus
/// subscription only tells the owner *when* to re-read.
pub struct ProductWishlistStatus {
    store: Arc<WishlistStore>,
    product_id: ProductId,
    subscription: Option<Subscription>,
}

impl ProductWishlistStatus {
    /// Status without change notifications.
    pub fn new(store: Arc<WishlistStore>, product_id: ProductId) -> Self {
        Self {
            store,
            product_id,
            subscription: None,
        }
    }

    /// Status that calls `on_change` with fresh membership whenever a
    /// delivered event may affect this product.
    ///
    /// The listener holds the store weakly, so a watcher never keeps the
    /// store alive on its own.
    pub fn watch<F>(store: Arc<WishlistStore>, product_id: ProductId, on_change: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let weak: Weak<WishlistStore> = Arc::downgrade(&store);
        let listener = listener_fn("product-status", move |event| {
            if !event.concerns(product_id) {
                return;
            }
            if let Some(store) = weak.upgrade() {
                on_change(store.is_member(product_id));
            }
        });
        let subscription = store.subscribe(listener);

        Self {
            store,
            product_id,
            subscription: Some(subscription),
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn is_wishlisted(&self) -> bool {
        self.store.is_member(self.product_id)
    }

    /// True while a mutation of this product is in flight; the control
    /// should be disabled.
    pub fn is_loading(&self) -> bool {
        self.store.is_mutating(self.product_id)
    }

    pub fn is_watching(&self) -> bool {
        self.subscription
            .as_ref()
            .map(Subscription::is_active)
            .unwrap_or(false)
    }

    pub async fn toggle(&self) -> Result<ToggleOutcome, WishlistError> {
        self.store.toggle(self.product_id.value()).await
    }
}
