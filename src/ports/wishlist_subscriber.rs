//! WishlistSubscriber port - how independent consumers register for changes.
//!
//! A consumer (navbar badge, product tile, wishlist page) registers when it
//! mounts and holds the returned [`Subscription`] for as long as it lives.
//! Dropping the subscription unregisters it.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

use crate::domain::foundation::ListenerId;
use crate::domain::wishlist::WishlistEvent;

/// Failure reported by a listener. Logged by the bus, never propagated.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Receives wishlist change notifications.
///
/// Implementations should be:
/// - **Quick** - delivery is sequential in registration order
/// - **Isolated** - a failure here never affects other listeners
pub trait SyncListener: Send + Sync {
    /// Handle one delivered event.
    fn on_event(&self, event: &WishlistEvent) -> Result<(), ListenerError>;

    /// Listener name for logging.
    fn name(&self) -> &str {
        "anonymous"
    }
}

struct FnListener<F> {
    name: &'static str,
    callback: F,
}

impl<F> SyncListener for FnListener<F>
where
    F: Fn(&WishlistEvent) + Send + Sync,
{
    fn on_event(&self, event: &WishlistEvent) -> Result<(), ListenerError> {
        (self.callback)(event);
        Ok(())
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Wraps a closure as a listener.
pub fn listener_fn<F>(name: &'static str, callback: F) -> Arc<dyn SyncListener>
where
    F: Fn(&WishlistEvent) + Send + Sync + 'static,
{
    Arc::new(FnListener { name, callback })
}

type CancelFn = Box<dyn FnOnce() + Send>;

/// Registration handle owned by one consumer.
///
/// `unsubscribe` is idempotent and dropping the handle unsubscribes,
/// so a consumer can never leak its registration past its own lifetime.
pub struct Subscription {
    id: ListenerId,
    cancel: Mutex<Option<CancelFn>>,
}

impl Subscription {
    pub fn new(id: ListenerId, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Unregister. Calling this more than once has no further effect.
    pub fn unsubscribe(&self) {
        let cancel = self
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Port for registering wishlist listeners.
pub trait WishlistSubscriber: Send + Sync {
    /// Register a listener. Delivery follows registration order.
    fn register(&self, listener: Arc<dyn SyncListener>) -> Subscription;
}

/// Combined trait for bus implementations.
pub trait WishlistBus: super::WishlistNotifier + WishlistSubscriber {}

// Blanket implementation - any type that implements both traits is a WishlistBus
impl<T: super::WishlistNotifier + WishlistSubscriber> WishlistBus for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[allow(dead_code)]
    fn assert_listener_object_safe(_: &dyn SyncListener) {}

    #[allow(dead_code)]
    fn assert_bus_object_safe(_: &dyn WishlistBus) {}

    #[test]
    fn unsubscribe_runs_cancel_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let subscription = Subscription::new(ListenerId::new(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(subscription.is_active());
        subscription.unsubscribe();
        subscription.unsubscribe();
        assert!(!subscription.is_active());
        drop(subscription);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_unsubscribes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        {
            let _subscription = Subscription::new(ListenerId::new(), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_fn_reports_its_name() {
        let listener = listener_fn("navbar-badge", |_| {});
        assert_eq!(listener.name(), "navbar-badge");
        assert!(listener.on_event(&WishlistEvent::Cleared).is_ok());
    }
}
