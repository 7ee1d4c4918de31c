//! Wishlist domain - entries, snapshots, change events, and failures.

mod entry;
mod errors;
mod events;
mod snapshot;
mod status;

pub use entry::{ProductSummary, WishlistEntry};
pub use errors::{ErrorKind, WishlistError};
pub use events::{WishlistEvent, WishlistEventKind};
pub use snapshot::WishlistSnapshot;
pub use status::StoreStatus;
