//! Failure taxonomy for wishlist operations.

use thiserror::Error;

use crate::domain::foundation::{ProductId, ValidationError};

/// Coarse classification used by the UI to pick a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No valid session; the user must sign in.
    AuthRequired,
    /// Malformed input rejected before any network call.
    Validation,
    /// The operation is impossible given current state. Informational, never retried.
    Conflict,
    /// Anything else that went wrong talking to the server.
    TransientNetwork,
}

/// Expected failures of store operations.
///
/// These are normal control flow for a UI-facing cache layer and are
/// returned, never panicked.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WishlistError {
    #[error("Authentication required")]
    AuthRequired,

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Product {0} is already in the wishlist")]
    AlreadyPresent(ProductId),

    #[error("Product {0} is not in the wishlist")]
    NotPresent(ProductId),

    #[error("Product {0} already has a wishlist update in progress")]
    MutationInProgress(ProductId),

    #[error("Network error: {0}")]
    Network(String),
}

impl WishlistError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        WishlistError::Network(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WishlistError::AuthRequired => ErrorKind::AuthRequired,
            WishlistError::Validation(_) => ErrorKind::Validation,
            WishlistError::AlreadyPresent(_)
            | WishlistError::NotPresent(_)
            | WishlistError::MutationInProgress(_) => ErrorKind::Conflict,
            WishlistError::Network(_) => ErrorKind::TransientNetwork,
        }
    }

    /// Message suitable for showing to the shopper.
    pub fn user_message(&self) -> &'static str {
        match self {
            WishlistError::AuthRequired => "Please sign in to manage your wishlist.",
            WishlistError::Validation(_) => "That product could not be found.",
            WishlistError::AlreadyPresent(_) => "This betta is already in your wishlist.",
            WishlistError::NotPresent(_) => "This betta is no longer in your wishlist.",
            WishlistError::MutationInProgress(_) => {
                "Still updating your wishlist, please wait a moment."
            }
            WishlistError::Network(_) => {
                "We couldn't reach the server. Please try again in a moment."
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::TransientNetwork
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: i64) -> ProductId {
        ProductId::new(raw).unwrap()
    }

    #[test]
    fn conflicts_share_a_kind() {
        assert_eq!(WishlistError::AlreadyPresent(pid(1)).kind(), ErrorKind::Conflict);
        assert_eq!(WishlistError::NotPresent(pid(1)).kind(), ErrorKind::Conflict);
        assert_eq!(
            WishlistError::MutationInProgress(pid(1)).kind(),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn validation_errors_convert() {
        let err: WishlistError = ProductId::new(0).unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn every_variant_has_a_distinct_message() {
        let errors = [
            WishlistError::AuthRequired,
            WishlistError::Validation(ValidationError::empty_field("product_id")),
            WishlistError::AlreadyPresent(pid(1)),
            WishlistError::NotPresent(pid(1)),
            WishlistError::MutationInProgress(pid(1)),
            WishlistError::network("timeout"),
        ];
        let mut messages: Vec<_> = errors.iter().map(|e| e.user_message()).collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), errors.len());
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(WishlistError::network("reset").is_retryable());
        assert!(!WishlistError::AuthRequired.is_retryable());
        assert!(!WishlistError::AlreadyPresent(pid(2)).is_retryable());
    }
}
