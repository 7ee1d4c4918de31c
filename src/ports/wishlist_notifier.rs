//! WishlistNotifier port - how the store announces wishlist changes.
//!
//! The store publishes without knowing who listens or how delivery is
//! scheduled (debounced, synchronous, recorded for tests).

use crate::domain::wishlist::WishlistEvent;

/// Port for publishing wishlist change notifications.
///
/// Implementations must ensure:
/// - Publishing never fails the caller
/// - A burst of events may be coalesced, but the last one is always delivered
/// - Every delivery reaches every listener registered at delivery time
pub trait WishlistNotifier: Send + Sync {
    /// Notify listeners of a change. May be debounced.
    fn emit(&self, event: WishlistEvent);

    /// Tell every listener to re-read from the source.
    ///
    /// Used when the notifier cannot carry enough information itself,
    /// e.g. after recovering from a failed refresh.
    fn force_sync(&self);
}
