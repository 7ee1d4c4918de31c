//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the wishlist core to external systems:
//! - `events` - Debounced synchronization bus
//! - `storage` - Cache persistence (in-memory, file)
//! - `session` - Credential store and login prompt
//! - `wishlist` - Wishlist API clients (HTTP, mock)

pub mod events;
pub mod session;
pub mod storage;
pub mod wishlist;

pub use events::SyncBus;
pub use session::{InMemoryCredentialStore, TracingLoginPrompt};
pub use storage::{FileCacheStorage, InMemoryCacheStorage};
pub use wishlist::{HttpWishlistApi, HttpWishlistConfig, MockWishlistApi};
