//! WishlistApi port - the server's wishlist REST contract.
//!
//! | Operation | Method & Path |
//! |---|---|
//! | List | `GET /wishlist` |
//! | Add | `POST /wishlist` with `{ "productId": n }` |
//! | Remove | `DELETE /wishlist/{productId}` |
//!
//! All calls carry a bearer token. The core never validates the token
//! itself; a `401` is its only feedback.

use async_trait::async_trait;
use thiserror::Error;

use super::AccessToken;
use crate::domain::foundation::ProductId;
use crate::domain::wishlist::WishlistEntry;

/// Errors returned by wishlist API implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// `401` - the credential was rejected.
    #[error("Unauthorized")]
    Unauthorized,

    /// `404` - the entry does not exist.
    #[error("Not found")]
    NotFound,

    /// `409` - the entry already exists.
    #[error("Conflict")]
    Conflict,

    /// Any other non-success status.
    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network(message.into())
    }
}

/// Port for the server-side wishlist.
///
/// Implementations must map `401`, `404`, and `409` to the dedicated
/// variants so the store can tell them apart from transport failures.
#[async_trait]
pub trait WishlistApi: Send + Sync {
    /// Fetch every entry for the authenticated user.
    async fn list(&self, token: &AccessToken) -> Result<Vec<WishlistEntry>, ApiError>;

    /// Add a product. Fails with `Conflict` when it is already present.
    async fn add(&self, token: &AccessToken, product_id: ProductId) -> Result<(), ApiError>;

    /// Remove a product. Fails with `NotFound` when it is absent.
    async fn remove(&self, token: &AccessToken, product_id: ProductId) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn WishlistApi) {}

    #[test]
    fn status_error_displays_code_and_message() {
        let err = ApiError::Status {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected status 503: maintenance");
    }
}
