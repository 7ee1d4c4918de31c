//! Application layer - the store and its collaborators.
//!
//! This layer orchestrates domain types and coordinates between ports:
//! - `cache` - fail-open TTL cache of the last snapshot
//! - `store` - authoritative wishlist state and operations
//! - `views` - per-product status and count consumers

pub mod cache;
pub mod store;
pub mod views;

pub use cache::{CacheRecord, WishlistCache, DEFAULT_CACHE_KEY, DEFAULT_MAX_AGE};
pub use store::{PurgeReport, ToggleOutcome, WishlistStore};
pub use views::{ProductWishlistStatus, WishlistBadge};
