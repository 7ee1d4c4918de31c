//! UI-facing consumers of the store.
//!
//! Views never keep their own copy of wishlist membership. They read the
//! store and use bus notifications only as a cue to re-read.

mod badge;
mod product_status;

pub use badge::WishlistBadge;
pub use product_status::ProductWishlistStatus;
