//! HTTP Wishlist API - Implementation of WishlistApi over the REST contract.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpWishlistConfig::new("https://shop.example.com/api")
//!     .with_timeout(Duration::from_secs(5));
//!
//! let api = HttpWishlistApi::new(config)?;
//! ```
//!
//! # Status mapping
//!
//! `401` -> `Unauthorized`, `404` -> `NotFound`, `409` -> `Conflict`,
//! any other non-2xx -> `Status` with the server's `message` when present.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::ProductId;
use crate::domain::wishlist::WishlistEntry;
use crate::ports::{AccessToken, ApiError, WishlistApi};

/// Configuration for the HTTP wishlist client.
#[derive(Debug, Clone)]
pub struct HttpWishlistConfig {
    /// API root, e.g. `https://shop.example.com/api`.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpWishlistConfig {
    /// Creates a new configuration for the given API root.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Wishlist API client backed by reqwest.
pub struct HttpWishlistApi {
    config: HttpWishlistConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Vec<WishlistEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddRequest {
    product_id: ProductId,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpWishlistApi {
    /// Creates a new client with the given configuration.
    pub fn new(config: HttpWishlistConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the wishlist collection URL.
    fn collection_url(&self) -> String {
        format!("{}/wishlist", self.config.base_url.trim_end_matches('/'))
    }

    /// Builds the URL of one product's entry.
    fn item_url(&self, product_id: ProductId) -> String {
        format!("{}/{}", self.collection_url(), product_id)
    }

    fn map_send_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::network(format!(
                "Request timed out after {}s",
                self.config.timeout.as_secs()
            ))
        } else if e.is_connect() {
            ApiError::network(format!("Connection failed: {}", e))
        } else {
            ApiError::network(e.to_string())
        }
    }

    /// Passes 2xx responses through and maps everything else to an `ApiError`.
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            StatusCode::CONFLICT => Err(ApiError::Conflict),
            _ => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorBody>(&body)
                    .ok()
                    .and_then(|b| b.message)
                    .unwrap_or(body);
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl WishlistApi for HttpWishlistApi {
    async fn list(&self, token: &AccessToken) -> Result<Vec<WishlistEntry>, ApiError> {
        tracing::debug!(url = %self.collection_url(), "Fetching wishlist");

        let response = self
            .client
            .get(self.collection_url())
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let body: ListResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(body.data)
    }

    async fn add(&self, token: &AccessToken, product_id: ProductId) -> Result<(), ApiError> {
        tracing::debug!(%product_id, "Adding product to wishlist");

        let response = self
            .client
            .post(self.collection_url())
            .bearer_auth(token.expose())
            .json(&AddRequest { product_id })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn remove(&self, token: &AccessToken, product_id: ProductId) -> Result<(), ApiError> {
        tracing::debug!(%product_id, "Removing product from wishlist");

        let response = self
            .client
            .delete(self.item_url(product_id))
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpWishlistApi {
        HttpWishlistApi::new(HttpWishlistConfig::new(base)).unwrap()
    }

    #[test]
    fn urls_tolerate_trailing_slash() {
        let with_slash = api("http://localhost:5000/api/");
        let without = api("http://localhost:5000/api");

        assert_eq!(with_slash.collection_url(), "http://localhost:5000/api/wishlist");
        assert_eq!(with_slash.collection_url(), without.collection_url());
    }

    #[test]
    fn item_url_appends_product_id() {
        let api = api("http://localhost:5000/api");
        let id = ProductId::new(42).unwrap();
        assert_eq!(api.item_url(id), "http://localhost:5000/api/wishlist/42");
    }

    #[test]
    fn add_request_uses_camel_case() {
        let body = serde_json::to_value(AddRequest {
            product_id: ProductId::new(7).unwrap(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "productId": 7 }));
    }

    #[test]
    fn config_builder_sets_timeout() {
        let config = HttpWishlistConfig::new("http://x").with_timeout(Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
