//! Event bus adapters.
//!
//! - `SyncBus` - Debounced, in-process fan-out bus for wishlist changes

mod sync_bus;

pub use sync_bus::{SyncBus, DEFAULT_DEBOUNCE};
