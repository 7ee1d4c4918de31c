//! Mock Wishlist API for testing and demos.
//!
//! Simulates the server side of the wishlist contract in memory, including
//! its rules: duplicate adds are `Conflict`, removing an absent product is
//! `NotFound`, a wrong bearer token is `Unauthorized`.
//!
//! # Features
//!
//! - Seeded server state and product catalog
//! - Simulated latency for overlap testing
//! - Error injection per call kind
//! - Call tracking for "no network call" assertions
//!
//! # Example
//!
//! ```ignore
//! let api = MockWishlistApi::new()
//!     .with_delay(Duration::from_millis(50))
//!     .with_entries(&[7, 8]);
//!
//! api.fail_next(CallKind::List, MockFailure::Network("reset".into()));
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::domain::foundation::{ProductId, Timestamp, UserId, WishlistEntryId};
use crate::domain::wishlist::{ProductSummary, WishlistEntry};
use crate::ports::{AccessToken, ApiError, WishlistApi};

/// Which endpoint a call hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    List,
    Add,
    Remove,
}

/// One recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiCall {
    pub kind: CallKind,
    pub product_id: Option<ProductId>,
}

/// Injected failure for the next call of a given kind.
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// Simulate a dropped connection.
    Network(String),
    /// Simulate an expired session.
    Unauthorized,
    /// Simulate an arbitrary HTTP status.
    Status(u16),
}

impl From<MockFailure> for ApiError {
    fn from(failure: MockFailure) -> Self {
        match failure {
            MockFailure::Network(message) => ApiError::Network(message),
            MockFailure::Unauthorized => ApiError::Unauthorized,
            MockFailure::Status(404) => ApiError::NotFound,
            MockFailure::Status(409) => ApiError::Conflict,
            MockFailure::Status(status) => ApiError::Status {
                status,
                message: "injected failure".to_string(),
            },
        }
    }
}

#[derive(Debug)]
struct MockState {
    user_id: UserId,
    entries: Vec<WishlistEntry>,
    next_id: i64,
    catalog: HashMap<ProductId, ProductSummary>,
    failures: VecDeque<(CallKind, MockFailure)>,
    calls: Vec<ApiCall>,
}

impl MockState {
    fn summary_for(&self, product_id: ProductId) -> ProductSummary {
        self.catalog
            .get(&product_id)
            .cloned()
            .unwrap_or_else(|| ProductSummary {
                name: format!("Betta #{}", product_id),
                price: 19.99,
                image_url: None,
                category_name: None,
            })
    }

    fn insert(&mut self, product_id: ProductId) {
        let entry = WishlistEntry {
            id: WishlistEntryId::new(self.next_id),
            user_id: self.user_id,
            product_id,
            product: Some(self.summary_for(product_id)),
            added_at: Timestamp::now(),
        };
        self.next_id += 1;
        self.entries.push(entry);
    }

    fn take_failure(&mut self, kind: CallKind) -> Option<MockFailure> {
        let index = self.failures.iter().position(|(k, _)| *k == kind)?;
        self.failures.remove(index).map(|(_, failure)| failure)
    }
}

/// In-memory stand-in for the wishlist server.
///
/// Clones share state, so a test can keep a handle while the store owns another.
#[derive(Debug, Clone)]
pub struct MockWishlistApi {
    state: Arc<Mutex<MockState>>,
    delay: Duration,
    accepted_token: Option<String>,
}

impl Default for MockWishlistApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWishlistApi {
    /// Creates an empty server that accepts any token.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                user_id: UserId::new(1),
                entries: Vec::new(),
                next_id: 1,
                catalog: HashMap::new(),
                failures: VecDeque::new(),
                calls: Vec::new(),
            })),
            delay: Duration::ZERO,
            accepted_token: None,
        }
    }

    /// Adds simulated latency to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Only this token is accepted; anything else is `Unauthorized`.
    pub fn with_accepted_token(mut self, token: impl Into<String>) -> Self {
        self.accepted_token = Some(token.into());
        self
    }

    /// Registers display fields for a product.
    pub fn with_product(self, product_id: ProductId, summary: ProductSummary) -> Self {
        self.lock().catalog.insert(product_id, summary);
        self
    }

    /// Seeds server-side entries.
    pub fn with_entries(self, product_ids: &[i64]) -> Self {
        {
            let mut state = self.lock();
            for raw in product_ids {
                if let Ok(product_id) = ProductId::new(*raw) {
                    state.insert(product_id);
                }
            }
        }
        self
    }

    /// Makes the next call of `kind` fail.
    pub fn fail_next(&self, kind: CallKind, failure: MockFailure) {
        self.lock().failures.push_back((kind, failure));
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn calls_of(&self, kind: CallKind) -> usize {
        self.lock().calls.iter().filter(|c| c.kind == kind).count()
    }

    pub fn reset_calls(&self) {
        self.lock().calls.clear();
    }

    /// What the server currently holds.
    pub fn server_product_ids(&self) -> Vec<ProductId> {
        self.lock().entries.iter().map(|e| e.product_id).collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the call, waits out the latency, then applies injected
    /// failures and the token check.
    async fn begin(
        &self,
        kind: CallKind,
        product_id: Option<ProductId>,
        token: &AccessToken,
    ) -> Result<(), ApiError> {
        self.lock().calls.push(ApiCall { kind, product_id });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(failure) = self.lock().take_failure(kind) {
            return Err(failure.into());
        }

        match &self.accepted_token {
            Some(accepted) if accepted != token.expose() => Err(ApiError::Unauthorized),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl WishlistApi for MockWishlistApi {
    async fn list(&self, token: &AccessToken) -> Result<Vec<WishlistEntry>, ApiError> {
        self.begin(CallKind::List, None, token).await?;
        Ok(self.lock().entries.clone())
    }

    async fn add(&self, token: &AccessToken, product_id: ProductId) -> Result<(), ApiError> {
        self.begin(CallKind::Add, Some(product_id), token).await?;

        let mut state = self.lock();
        if state.entries.iter().any(|e| e.product_id == product_id) {
            return Err(ApiError::Conflict);
        }
        state.insert(product_id);
        Ok(())
    }

    async fn remove(&self, token: &AccessToken, product_id: ProductId) -> Result<(), ApiError> {
        self.begin(CallKind::Remove, Some(product_id), token).await?;

        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|e| e.product_id != product_id);
        if state.entries.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> AccessToken {
        AccessToken::new("token")
    }

    fn pid(raw: i64) -> ProductId {
        ProductId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn add_then_list_returns_entry_with_summary() {
        let api = MockWishlistApi::new();
        api.add(&token(), pid(7)).await.unwrap();

        let entries = api.list(&token()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].product_id, pid(7));
        assert_eq!(entries[0].display_name(), "Betta #7");
    }

    #[tokio::test]
    async fn duplicate_add_is_conflict() {
        let api = MockWishlistApi::new().with_entries(&[7]);
        let result = api.add(&token(), pid(7)).await;
        assert_eq!(result, Err(ApiError::Conflict));
        assert_eq!(api.server_product_ids(), vec![pid(7)]);
    }

    #[tokio::test]
    async fn removing_absent_product_is_not_found() {
        let api = MockWishlistApi::new();
        assert_eq!(api.remove(&token(), pid(3)).await, Err(ApiError::NotFound));
    }

    #[tokio::test]
    async fn wrong_token_is_unauthorized() {
        let api = MockWishlistApi::new().with_accepted_token("good");
        let result = api.list(&AccessToken::new("bad")).await;
        assert_eq!(result, Err(ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn injected_failure_hits_only_matching_kind() {
        let api = MockWishlistApi::new();
        api.fail_next(CallKind::List, MockFailure::Status(500));

        api.add(&token(), pid(1)).await.unwrap();
        assert!(matches!(
            api.list(&token()).await,
            Err(ApiError::Status { status: 500, .. })
        ));
        assert_eq!(api.list(&token()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn calls_are_recorded() {
        let api = MockWishlistApi::new();
        api.list(&token()).await.unwrap();
        api.add(&token(), pid(2)).await.unwrap();

        assert_eq!(api.call_count(), 2);
        assert_eq!(api.calls_of(CallKind::Add), 1);
        assert_eq!(
            api.calls()[1],
            ApiCall {
                kind: CallKind::Add,
                product_id: Some(pid(2))
            }
        );

        api.reset_calls();
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn catalog_summary_is_embedded() {
        let api = MockWishlistApi::new().with_product(
            pid(5),
            ProductSummary {
                name: "Koi Plakat".to_string(),
                price: 45.0,
                image_url: Some("/img/koi.jpg".to_string()),
                category_name: Some("Plakat".to_string()),
            },
        );
        api.add(&token(), pid(5)).await.unwrap();

        let entries = api.list(&token()).await.unwrap();
        assert_eq!(entries[0].display_name(), "Koi Plakat");
    }
}
