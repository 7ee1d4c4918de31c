//! Wishlist change notifications relayed by the sync bus.

use std::fmt;

use super::WishlistSnapshot;
use crate::domain::foundation::ProductId;

/// A change notification.
///
/// Consumers should treat every event as a full replacement of the state
/// they care about; delivery is debounced and ordering across operations is
/// not guaranteed.
#[derive(Debug, Clone, PartialEq)]
pub enum WishlistEvent {
    /// The full snapshot was replaced.
    Updated { snapshot: WishlistSnapshot },

    /// A product was added; `total_count` is the new wishlist size.
    ItemAdded {
        product_id: ProductId,
        total_count: usize,
    },

    /// A product was removed; `total_count` is the new wishlist size.
    ItemRemoved {
        product_id: ProductId,
        total_count: usize,
    },

    /// The wishlist was emptied.
    Cleared,

    /// Consumers should re-read from the source; the bus has no payload to offer.
    ForceRefresh,
}

/// Discriminant of [`WishlistEvent`], for logging and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WishlistEventKind {
    Updated,
    ItemAdded,
    ItemRemoved,
    Cleared,
    ForceRefresh,
}

impl WishlistEvent {
    pub fn kind(&self) -> WishlistEventKind {
        match self {
            WishlistEvent::Updated { .. } => WishlistEventKind::Updated,
            WishlistEvent::ItemAdded { .. } => WishlistEventKind::ItemAdded,
            WishlistEvent::ItemRemoved { .. } => WishlistEventKind::ItemRemoved,
            WishlistEvent::Cleared => WishlistEventKind::Cleared,
            WishlistEvent::ForceRefresh => WishlistEventKind::ForceRefresh,
        }
    }

    /// Wishlist size after this event, when the event carries it.
    pub fn total_count(&self) -> Option<usize> {
        match self {
            WishlistEvent::Updated { snapshot } => Some(snapshot.count()),
            WishlistEvent::ItemAdded { total_count, .. }
            | WishlistEvent::ItemRemoved { total_count, .. } => Some(*total_count),
            WishlistEvent::Cleared => Some(0),
            WishlistEvent::ForceRefresh => None,
        }
    }

    /// Whether a consumer tracking `product_id` needs to re-render.
    pub fn concerns(&self, product_id: ProductId) -> bool {
        match self {
            WishlistEvent::ItemAdded { product_id: id, .. }
            | WishlistEvent::ItemRemoved { product_id: id, .. } => *id == product_id,
            WishlistEvent::Updated { .. } | WishlistEvent::Cleared | WishlistEvent::ForceRefresh => {
                true
            }
        }
    }
}

impl fmt::Display for WishlistEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WishlistEventKind::Updated => "updated",
            WishlistEventKind::ItemAdded => "item_added",
            WishlistEventKind::ItemRemoved => "item_removed",
            WishlistEventKind::Cleared => "cleared",
            WishlistEventKind::ForceRefresh => "force_refresh",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: i64) -> ProductId {
        ProductId::new(raw).unwrap()
    }

    #[test]
    fn total_count_per_variant() {
        let added = WishlistEvent::ItemAdded {
            product_id: pid(7),
            total_count: 3,
        };
        assert_eq!(added.total_count(), Some(3));
        assert_eq!(WishlistEvent::Cleared.total_count(), Some(0));
        assert_eq!(WishlistEvent::ForceRefresh.total_count(), None);
        assert_eq!(
            WishlistEvent::Updated {
                snapshot: WishlistSnapshot::empty()
            }
            .total_count(),
            Some(0)
        );
    }

    #[test]
    fn item_events_concern_only_their_product() {
        let removed = WishlistEvent::ItemRemoved {
            product_id: pid(7),
            total_count: 0,
        };
        assert!(removed.concerns(pid(7)));
        assert!(!removed.concerns(pid(8)));
        assert!(WishlistEvent::Cleared.concerns(pid(8)));
    }

    #[test]
    fn kind_displays_snake_case() {
        assert_eq!(WishlistEventKind::ItemAdded.to_string(), "item_added");
        assert_eq!(WishlistEvent::ForceRefresh.kind().to_string(), "force_refresh");
    }
}
