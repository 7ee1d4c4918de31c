//! Wishlist API adapters.
//!
//! - `HttpWishlistApi` - reqwest client for the server's REST contract
//! - `MockWishlistApi` - In-memory server simulation for tests and demos

mod http_client;
mod mock_api;

pub use http_client::{HttpWishlistApi, HttpWishlistConfig};
pub use mock_api::{ApiCall, CallKind, MockFailure, MockWishlistApi};
