//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `wishlist` - Wishlist entries, snapshots, change events, and failure taxonomy

pub mod foundation;
pub mod wishlist;
