//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the wishlist core and the outside world. Adapters implement these ports.
//!
//! ## Server Ports
//!
//! - `WishlistApi` - The server's wishlist REST contract
//!
//! ## Session Ports
//!
//! - `CredentialStore` - Where the access credential lives
//! - `LoginPrompt` - Triggers the sign-in flow
//!
//! ## Local Ports
//!
//! - `CacheStorage` - Session-scoped persistence behind the TTL cache
//! - `WishlistNotifier` / `WishlistSubscriber` - The synchronization bus

mod cache_storage;
mod session;
mod wishlist_api;
mod wishlist_notifier;
mod wishlist_subscriber;

pub use cache_storage::{CacheStorage, CacheStorageError};
pub use session::{AccessToken, CredentialStore, LoginPrompt, LoginReason};
pub use wishlist_api::{ApiError, WishlistApi};
pub use wishlist_notifier::WishlistNotifier;
pub use wishlist_subscriber::{
    listener_fn, ListenerError, Subscription, SyncListener, WishlistBus, WishlistSubscriber,
};
