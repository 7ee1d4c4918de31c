//! Debounced, in-process wishlist synchronization bus.
//!
//! One `SyncBus` is created at startup and handed (as `Arc<dyn WishlistBus>`)
//! to the store and to every consumer that wants notifications. It owns
//! only the listener registry; it never holds application data beyond the
//! single pending event of the current debounce window.
//!
//! # Delivery
//!
//! - `emit` stores the event as pending and (re)starts a timer. When the
//!   window elapses without another `emit`, the last pending event is
//!   delivered once. A burst of N emits therefore yields one delivery.
//! - Listeners are invoked in registration order. Each invocation is
//!   isolated: an `Err` or a panic is logged and delivery moves on.
//! - Listeners are looked up again right before each invocation, so a
//!   listener unregistered while an event is pending is never called.
//!
//! # Example
//!
//! ```ignore
//! let bus = Arc::new(SyncBus::with_defaults());
//! let subscription = bus.register(listener_fn("navbar", |event| { /* ... */ }));
//! bus.emit(WishlistEvent::Cleared);
//! ```

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::domain::foundation::{ListenerId, Timestamp};
use crate::domain::wishlist::{WishlistEvent, WishlistEventKind};
use crate::ports::{Subscription, SyncListener, WishlistNotifier, WishlistSubscriber};

/// Default coalescing window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

const EMISSION_HISTORY: usize = 64;

/// Process-wide publish/subscribe relay for wishlist changes.
///
/// Cloning is cheap and yields a handle to the same bus.
#[derive(Clone)]
pub struct SyncBus {
    inner: Arc<BusInner>,
}

struct Registered {
    id: ListenerId,
    listener: Arc<dyn SyncListener>,
}

struct BusInner {
    debounce: Duration,
    listeners: Mutex<Vec<Registered>>,
    pending: Mutex<Option<WishlistEvent>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    last_update: Mutex<Option<Timestamp>>,
    history: Mutex<VecDeque<WishlistEvent>>,
}

// Every guarded value is replaced wholesale, so a poisoned lock still holds
// consistent data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SyncBus {
    /// Creates a bus with the given coalescing window.
    ///
    /// A zero window disables coalescing and delivers synchronously.
    pub fn new(debounce: Duration) -> Self {
        Self {
            inner: Arc::new(BusInner {
                debounce,
                listeners: Mutex::new(Vec::new()),
                pending: Mutex::new(None),
                timer: Mutex::new(None),
                last_update: Mutex::new(None),
                history: Mutex::new(VecDeque::with_capacity(EMISSION_HISTORY)),
            }),
        }
    }

    /// Creates a bus with the default 100 ms window.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }

    pub fn debounce(&self) -> Duration {
        self.inner.debounce
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }

    /// When the last notification was delivered.
    pub fn last_update_time(&self) -> Option<Timestamp> {
        *lock(&self.inner.last_update)
    }

    /// True when nothing has been delivered within `max_age`.
    ///
    /// Consumers use this to decide whether an independent fetch is worth it.
    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.last_update_time()
            .map(|ts| !ts.is_within(max_age))
            .unwrap_or(true)
    }

    /// True while an event is waiting for its window to elapse.
    pub fn has_pending(&self) -> bool {
        lock(&self.inner.pending).is_some()
    }

    /// Deliver the pending event now instead of waiting for the timer.
    pub fn flush(&self) {
        self.inner.cancel_timer();
        self.inner.deliver_pending();
    }

    /// The most recent emitted events, before coalescing, oldest first.
    pub fn recent_emissions(&self) -> Vec<WishlistEvent> {
        lock(&self.inner.history).iter().cloned().collect()
    }

    /// Recent emitted events of one kind.
    pub fn emissions_of(&self, kind: WishlistEventKind) -> Vec<WishlistEvent> {
        lock(&self.inner.history)
            .iter()
            .filter(|event| event.kind() == kind)
            .cloned()
            .collect()
    }
}

impl Default for SyncBus {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl BusInner {
    fn record(&self, event: &WishlistEvent) {
        let mut history = lock(&self.history);
        if history.len() == EMISSION_HISTORY {
            history.pop_front();
        }
        history.push_back(event.clone());
    }

    fn cancel_timer(&self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
    }

    fn deliver_pending(&self) {
        let event = lock(&self.pending).take();
        if let Some(event) = event {
            self.deliver(&event);
        }
    }

    fn deliver(&self, event: &WishlistEvent) -> usize {
        *lock(&self.last_update) = Some(Timestamp::now());

        let ids: Vec<ListenerId> = lock(&self.listeners).iter().map(|r| r.id).collect();
        let mut delivered = 0;

        for id in ids {
            // Re-check registration: the listener may have unsubscribed since
            // the snapshot above (including from inside an earlier callback).
            let listener = lock(&self.listeners)
                .iter()
                .find(|r| r.id == id)
                .map(|r| Arc::clone(&r.listener));
            let Some(listener) = listener else {
                continue;
            };

            match catch_unwind(AssertUnwindSafe(|| listener.on_event(event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    tracing::warn!(listener = listener.name(), error = %e, "Wishlist listener failed");
                }
                Err(_) => {
                    tracing::error!(listener = listener.name(), "Wishlist listener panicked");
                }
            }
        }

        tracing::debug!(event = %event.kind(), delivered, "Delivered wishlist event");
        delivered
    }

    fn unregister(&self, id: ListenerId) {
        lock(&self.listeners).retain(|r| r.id != id);
    }
}

impl WishlistNotifier for SyncBus {
    fn emit(&self, event: WishlistEvent) {
        self.inner.record(&event);

        if self.inner.debounce.is_zero() {
            self.inner.deliver(&event);
            return;
        }

        *lock(&self.inner.pending) = Some(event);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let weak = Arc::downgrade(&self.inner);
                let debounce = self.inner.debounce;
                let timer = handle.spawn(async move {
                    tokio::time::sleep(debounce).await;
                    if let Some(inner) = weak.upgrade() {
                        inner.deliver_pending();
                    }
                });
                let previous = lock(&self.inner.timer).replace(timer);
                if let Some(previous) = previous {
                    previous.abort();
                }
            }
            Err(_) => {
                tracing::debug!("No async runtime, delivering wishlist event immediately");
                self.inner.deliver_pending();
            }
        }
    }

    fn force_sync(&self) {
        // A refresh supersedes whatever payload was waiting.
        self.inner.cancel_timer();
        lock(&self.inner.pending).take();

        let event = WishlistEvent::ForceRefresh;
        self.inner.record(&event);
        self.inner.deliver(&event);
    }
}

impl WishlistSubscriber for SyncBus {
    fn register(&self, listener: Arc<dyn SyncListener>) -> Subscription {
        let id = ListenerId::new();
        tracing::debug!(listener = listener.name(), %id, "Registering wishlist listener");
        lock(&self.inner.listeners).push(Registered { id, listener });

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(id, move || {
            if let Some(inner) = weak.upgrade() {
                inner.unregister(id);
            }
        })
    }
}
