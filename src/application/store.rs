//! WishlistStore - the single authoritative copy of the session's wishlist.
//!
//! Only the store mutates wishlist state. It talks to the server through
//! [`WishlistApi`], remembers results in the [`WishlistCache`], and tells
//! every registered consumer about changes through the [`WishlistBus`].
//!
//! # Consistency rules
//!
//! - `add` re-fetches the canonical list after the server accepts it.
//! - `remove` drops the entry locally once the server confirms it.
//! - A failed call never touches the last known good snapshot.
//! - Two mutations of the same product never overlap; the second one fails
//!   with [`WishlistError::MutationInProgress`].
//! - Results of calls started before a logout or session loss are discarded.

use futures::future::join_all;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::WishlistCache;
use crate::domain::foundation::ProductId;
use crate::domain::wishlist::{StoreStatus, WishlistError, WishlistEvent, WishlistSnapshot};
use crate::ports::{
    AccessToken, ApiError, CredentialStore, LoginPrompt, LoginReason, Subscription, SyncListener,
    WishlistApi, WishlistBus,
};

/// Which call produced an `ApiError`; decides how 404 and 409 are read.
#[derive(Debug, Clone, Copy)]
enum Endpoint {
    List,
    Add(ProductId),
    Remove(ProductId),
    Purge,
}

/// What a committed result does to the cache.
#[derive(Debug, Clone, Copy)]
enum CacheUpdate {
    Write,
    Clear,
}

/// Result of a successful toggle.
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Added(WishlistSnapshot),
    Removed(WishlistSnapshot),
}

impl ToggleOutcome {
    /// Membership after the toggle.
    pub fn is_wishlisted(&self) -> bool {
        matches!(self, ToggleOutcome::Added(_))
    }

    pub fn snapshot(&self) -> &WishlistSnapshot {
        match self {
            ToggleOutcome::Added(snapshot) | ToggleOutcome::Removed(snapshot) => snapshot,
        }
    }
}

/// Outcome of deleting every entry server-side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurgeReport {
    /// Products no longer on the server (deleted now or already gone).
    pub removed: Vec<ProductId>,
    /// Products whose delete failed; they stay in the snapshot.
    pub failed: Vec<(ProductId, WishlistError)>,
}

impl PurgeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Default)]
struct StoreState {
    snapshot: WishlistSnapshot,
    status: StoreStatus,
    last_error: Option<WishlistError>,
    /// Operations in flight for the current session.
    pending_ops: usize,
    /// Bumped on logout and on session loss.
    session: u64,
}

/// Releases a product's mutation lock when dropped.
struct ProductGuard<'a> {
    in_flight: &'a Mutex<HashSet<ProductId>>,
    product_id: ProductId,
}

impl Drop for ProductGuard<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.product_id);
    }
}

/// Client-side wishlist store.
pub struct WishlistStore {
    api: Arc<dyn WishlistApi>,
    credentials: Arc<dyn CredentialStore>,
    login_prompt: Arc<dyn LoginPrompt>,
    cache: WishlistCache,
    bus: Arc<dyn WishlistBus>,
    state: RwLock<StoreState>,
    in_flight: Mutex<HashSet<ProductId>>,
}

impl WishlistStore {
    pub fn new(
        api: Arc<dyn WishlistApi>,
        credentials: Arc<dyn CredentialStore>,
        login_prompt: Arc<dyn LoginPrompt>,
        cache: WishlistCache,
        bus: Arc<dyn WishlistBus>,
    ) -> Self {
        Self {
            api,
            credentials,
            login_prompt,
            cache,
            bus,
            state: RwLock::new(StoreState::default()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Reads
    // ════════════════════════════════════════════════════════════════════════

    pub fn snapshot(&self) -> WishlistSnapshot {
        self.read_state().snapshot.clone()
    }

    pub fn count(&self) -> usize {
        self.read_state().snapshot.count()
    }

    pub fn is_member(&self, product_id: ProductId) -> bool {
        self.read_state().snapshot.contains(product_id)
    }

    pub fn status(&self) -> StoreStatus {
        self.read_state().status
    }

    pub fn is_loading(&self) -> bool {
        self.read_state().status.is_loading()
    }

    /// Whether a mutation of this product is in flight.
    pub fn is_mutating(&self, product_id: ProductId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&product_id)
    }

    pub fn last_error(&self) -> Option<WishlistError> {
        self.read_state().last_error.clone()
    }

    /// Count persisted alongside the cache record, if any.
    pub fn cached_count(&self) -> Option<usize> {
        self.cache.cached_count()
    }

    /// Registers a consumer on the store's bus.
    pub fn subscribe(&self, listener: Arc<dyn SyncListener>) -> Subscription {
        self.bus.register(listener)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Operations
    // ════════════════════════════════════════════════════════════════════════

    /// Loads the wishlist, from cache when allowed and fresh, else from the server.
    pub async fn fetch(&self, use_cache: bool) -> Result<WishlistSnapshot, WishlistError> {
        // 1. Fresh cache short-circuits the network entirely
        if use_cache {
            if let Some(record) = self.cache.read_fresh() {
                let snapshot = record.into_snapshot();
                self.install(snapshot.clone());
                self.settle_from_cache();
                return Ok(snapshot);
            }
        }

        // 2. No session: empty state, no prompt (the caller decides)
        let Some(token) = self.credentials.access_token() else {
            self.drop_entries();
            return Err(self.record_failure(WishlistError::AuthRequired));
        };

        // 3. Network read
        let session = self.begin_op();
        let result = self.load(&token, session).await;
        self.finish_op(session, result.as_ref().err());
        result
    }

    /// Adds a product, then re-fetches the canonical list.
    pub async fn add(&self, product_id: i64) -> Result<WishlistSnapshot, WishlistError> {
        let token = self.require_session()?;
        let product_id = self.validate(product_id)?;
        let _guard = self.lock_product(product_id)?;

        let session = self.begin_op();
        let result = self.add_locked(&token, product_id, session).await;
        self.finish_op(session, result.as_ref().err());
        result
    }

    /// Removes a product and drops it from the local snapshot.
    pub async fn remove(&self, product_id: i64) -> Result<WishlistSnapshot, WishlistError> {
        let token = self.require_session()?;
        let product_id = self.validate(product_id)?;
        let _guard = self.lock_product(product_id)?;

        let session = self.begin_op();
        let result = self.remove_locked(&token, product_id, session).await;
        self.finish_op(session, result.as_ref().err());
        result
    }

    /// Adds or removes depending on current membership. Exactly one call is made.
    pub async fn toggle(&self, product_id: i64) -> Result<ToggleOutcome, WishlistError> {
        let token = self.require_session()?;
        let product_id = self.validate(product_id)?;
        let _guard = self.lock_product(product_id)?;

        // Membership is read under the product lock so a concurrent toggle
        // of the same product cannot act on the same stale answer.
        let was_member = self.is_member(product_id);

        let session = self.begin_op();
        let result = if was_member {
            self.remove_locked(&token, product_id, session)
                .await
                .map(ToggleOutcome::Removed)
        } else {
            self.add_locked(&token, product_id, session)
                .await
                .map(ToggleOutcome::Added)
        };
        self.finish_op(session, result.as_ref().err());
        result
    }

    /// Empties local state and the cache. No server calls.
    pub fn clear(&self) {
        {
            let mut state = self.write_state();
            state.snapshot = WishlistSnapshot::cleared();
        }
        self.cache.clear();
        self.bus.emit(WishlistEvent::Cleared);
        tracing::debug!("Wishlist cleared locally");
    }

    /// Deletes every entry on the server, one concurrent DELETE per product.
    ///
    /// Products already locked by another mutation are reported as failed
    /// with `MutationInProgress`.
    pub async fn purge(&self) -> Result<PurgeReport, WishlistError> {
        let token = self.require_session()?;

        let mut report = PurgeReport::default();
        let mut guards = Vec::new();
        let mut targets = Vec::new();
        for product_id in self.snapshot().product_ids() {
            match self.lock_product(product_id) {
                Ok(guard) => {
                    guards.push(guard);
                    targets.push(product_id);
                }
                Err(e) => report.failed.push((product_id, e)),
            }
        }

        let session = self.begin_op();
        let token = &token;
        let results = join_all(targets.iter().map(|&product_id| async move {
            (product_id, self.api.remove(token, product_id).await)
        }))
        .await;

        let mut unauthorized = false;
        for (product_id, result) in results {
            match result {
                Ok(()) | Err(ApiError::NotFound) => report.removed.push(product_id),
                Err(ApiError::Unauthorized) => unauthorized = true,
                Err(e) => report.failed.push((
                    product_id,
                    self.classify(session, Endpoint::Remove(product_id), e),
                )),
            }
        }

        if unauthorized {
            let error = self.classify(session, Endpoint::Purge, ApiError::Unauthorized);
            self.finish_op(session, Some(&error));
            return Err(error);
        }

        let removed = report.removed.clone();
        let Some((snapshot, _)) = self.commit(session, CacheUpdate::Clear, |current| {
            removed
                .iter()
                .fold(current.clone(), |next, product_id| next.without(*product_id))
        }) else {
            let error = self.session_ended();
            self.finish_op(session, Some(&error));
            return Err(error);
        };

        let mut events: Vec<WishlistEvent> = report
            .removed
            .iter()
            .map(|product_id| WishlistEvent::ItemRemoved {
                product_id: *product_id,
                total_count: snapshot.count(),
            })
            .collect();
        events.push(if snapshot.is_empty() {
            WishlistEvent::Cleared
        } else {
            WishlistEvent::Updated { snapshot }
        });
        self.emit_for(session, events);

        tracing::info!(
            removed = report.removed.len(),
            failed = report.failed.len(),
            "Wishlist purge finished"
        );
        self.finish_op(session, report.failed.first().map(|(_, e)| e));
        drop(guards);
        Ok(report)
    }

    /// Ends the session: forgets the credential, cache and snapshot.
    ///
    /// Calls still in flight finish against the server, but their results
    /// are discarded.
    pub fn logout(&self) {
        {
            let mut state = self.write_state();
            state.session += 1;
            state.pending_ops = 0;
            state.snapshot = WishlistSnapshot::empty();
            state.last_error = None;
            state.status = StoreStatus::Idle;
        }
        self.credentials.invalidate();
        self.cache.clear();
        self.bus.emit(WishlistEvent::Cleared);
        tracing::info!("Wishlist session ended");
    }

    // ════════════════════════════════════════════════════════════════════════
    // Internals
    // ════════════════════════════════════════════════════════════════════════

    async fn load(
        &self,
        token: &AccessToken,
        session: u64,
    ) -> Result<WishlistSnapshot, WishlistError> {
        let entries = self
            .api
            .list(token)
            .await
            .map_err(|e| self.classify(session, Endpoint::List, e))?;

        let fetched = WishlistSnapshot::from_entries(entries);
        let (snapshot, changed) = self
            .commit(session, CacheUpdate::Write, |_| fetched)
            .ok_or_else(|| self.session_ended())?;
        if changed {
            self.emit_for(
                session,
                vec![WishlistEvent::Updated {
                    snapshot: snapshot.clone(),
                }],
            );
        }
        Ok(snapshot)
    }

    async fn add_locked(
        &self,
        token: &AccessToken,
        product_id: ProductId,
        session: u64,
    ) -> Result<WishlistSnapshot, WishlistError> {
        self.api
            .add(token, product_id)
            .await
            .map_err(|e| self.classify(session, Endpoint::Add(product_id), e))?;

        let entries = match self.api.list(token).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(%product_id, error = %e, "Add succeeded but refetch failed");
                let error = self.classify(session, Endpoint::List, e);
                if self.is_current(session) {
                    self.cache.clear();
                    self.bus.force_sync();
                }
                return Err(error);
            }
        };

        let fetched = WishlistSnapshot::from_entries(entries);
        let (snapshot, _) = self
            .commit(session, CacheUpdate::Write, |_| fetched)
            .ok_or_else(|| self.session_ended())?;

        self.emit_for(
            session,
            vec![
                WishlistEvent::ItemAdded {
                    product_id,
                    total_count: snapshot.count(),
                },
                WishlistEvent::Updated {
                    snapshot: snapshot.clone(),
                },
            ],
        );

        tracing::info!(%product_id, count = snapshot.count(), "Product added to wishlist");
        Ok(snapshot)
    }

    async fn remove_locked(
        &self,
        token: &AccessToken,
        product_id: ProductId,
        session: u64,
    ) -> Result<WishlistSnapshot, WishlistError> {
        self.api
            .remove(token, product_id)
            .await
            .map_err(|e| self.classify(session, Endpoint::Remove(product_id), e))?;

        let (snapshot, _) = self
            .commit(session, CacheUpdate::Clear, |current| {
                current.without(product_id)
            })
            .ok_or_else(|| self.session_ended())?;

        self.emit_for(
            session,
            vec![
                WishlistEvent::ItemRemoved {
                    product_id,
                    total_count: snapshot.count(),
                },
                WishlistEvent::Updated {
                    snapshot: snapshot.clone(),
                },
            ],
        );

        tracing::info!(%product_id, count = snapshot.count(), "Product removed from wishlist");
        Ok(snapshot)
    }

    /// Applies a server result to the snapshot and the cache in one step,
    /// unless the session it was requested under has ended.
    ///
    /// Returns the new snapshot and whether its entries changed.
    fn commit(
        &self,
        session: u64,
        cache: CacheUpdate,
        update: impl FnOnce(&WishlistSnapshot) -> WishlistSnapshot,
    ) -> Option<(WishlistSnapshot, bool)> {
        let mut state = self.write_state();
        if state.session != session {
            return None;
        }
        let next = update(&state.snapshot);
        let changed = !state.snapshot.same_entries(&next);
        // Cache follows the snapshot under the same lock so logout cannot
        // clear it in between.
        match cache {
            CacheUpdate::Write => self.cache.write(&next),
            CacheUpdate::Clear => self.cache.clear(),
        }
        state.snapshot = next.clone();
        Some((next, changed))
    }

    fn emit_for(&self, session: u64, events: Vec<WishlistEvent>) {
        if !self.is_current(session) {
            tracing::debug!("Session ended before notification, dropping events");
            return;
        }
        for event in events {
            self.bus.emit(event);
        }
    }

    fn is_current(&self, session: u64) -> bool {
        self.read_state().session == session
    }

    fn session_ended(&self) -> WishlistError {
        tracing::debug!("Session ended while the call was in flight, discarding result");
        WishlistError::AuthRequired
    }

    /// Replaces the snapshot, emitting `Updated` only when entries changed.
    fn install(&self, snapshot: WishlistSnapshot) {
        let changed = {
            let mut state = self.write_state();
            let changed = !state.snapshot.same_entries(&snapshot);
            state.snapshot = snapshot.clone();
            changed
        };
        if changed {
            self.bus.emit(WishlistEvent::Updated { snapshot });
        }
    }

    /// Empties the snapshot, emitting `Cleared` if anything was dropped.
    fn drop_entries(&self) {
        let had_entries = {
            let mut state = self.write_state();
            let had_entries = !state.snapshot.is_empty();
            state.snapshot = WishlistSnapshot::empty();
            had_entries
        };
        if had_entries {
            self.bus.emit(WishlistEvent::Cleared);
        }
    }

    fn require_session(&self) -> Result<AccessToken, WishlistError> {
        match self.credentials.access_token() {
            Some(token) => Ok(token),
            None => {
                tracing::info!("Wishlist change attempted without a session");
                self.login_prompt.require_login(LoginReason::NoSession);
                Err(self.record_failure(WishlistError::AuthRequired))
            }
        }
    }

    fn validate(&self, product_id: i64) -> Result<ProductId, WishlistError> {
        ProductId::new(product_id).map_err(|e| self.record_failure(e.into()))
    }

    fn lock_product(&self, product_id: ProductId) -> Result<ProductGuard<'_>, WishlistError> {
        let inserted = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product_id);

        if !inserted {
            tracing::debug!(%product_id, "Rejecting overlapping wishlist mutation");
            return Err(WishlistError::MutationInProgress(product_id));
        }
        Ok(ProductGuard {
            in_flight: &self.in_flight,
            product_id,
        })
    }

    /// Maps a transport failure onto the store taxonomy.
    fn classify(&self, session: u64, call: Endpoint, error: ApiError) -> WishlistError {
        match (error, call) {
            (ApiError::Unauthorized, _) if !self.is_current(session) => self.session_ended(),
            (ApiError::Unauthorized, Endpoint::List) => self.handle_unauthorized(false),
            (ApiError::Unauthorized, _) => self.handle_unauthorized(true),
            (ApiError::Conflict, Endpoint::Add(product_id)) => {
                WishlistError::AlreadyPresent(product_id)
            }
            (ApiError::NotFound, Endpoint::Remove(product_id)) => {
                WishlistError::NotPresent(product_id)
            }
            (ApiError::Status { status, message }, _) => {
                WishlistError::network(format!("Server returned {}: {}", status, message))
            }
            (ApiError::Decode(message), _) => {
                WishlistError::network(format!("Unreadable server response: {}", message))
            }
            (ApiError::Network(message), _) => WishlistError::Network(message),
            (other, call) => WishlistError::network(format!("Unexpected {} for {:?}", other, call)),
        }
    }

    /// Server rejected the session: forget it and everything derived from it.
    fn handle_unauthorized(&self, prompt: bool) -> WishlistError {
        tracing::info!("Server rejected the session, dropping wishlist state");
        {
            let mut state = self.write_state();
            state.session += 1;
            state.pending_ops = 0;
            state.last_error = Some(WishlistError::AuthRequired);
            if let Ok(next) = state.status.transition_to(StoreStatus::Error) {
                state.status = next;
            }
        }
        self.credentials.invalidate();
        self.cache.clear();
        self.drop_entries();
        if prompt {
            self.login_prompt.require_login(LoginReason::SessionExpired);
        }
        WishlistError::AuthRequired
    }

    /// Marks an operation in flight and returns the session it belongs to.
    fn begin_op(&self) -> u64 {
        let mut state = self.write_state();
        state.pending_ops += 1;
        if let Ok(next) = state.status.transition_to(StoreStatus::Loading) {
            state.status = next;
        }
        state.session
    }

    /// The last operation to settle decides between Ready and Error.
    /// Operations from an ended session leave the status alone.
    fn finish_op(&self, session: u64, error: Option<&WishlistError>) {
        let mut state = self.write_state();
        if state.session != session {
            return;
        }
        state.pending_ops = state.pending_ops.saturating_sub(1);
        state.last_error = error.cloned();

        if state.pending_ops > 0 {
            return;
        }
        let target = match error {
            Some(e) if e.is_retryable() || *e == WishlistError::AuthRequired => StoreStatus::Error,
            _ => StoreStatus::Ready,
        };
        match state.status.transition_to(target) {
            Ok(next) => state.status = next,
            Err(e) => tracing::debug!(error = %e, "Store status left unchanged"),
        }
    }

    fn settle_from_cache(&self) {
        let mut state = self.write_state();
        if state.pending_ops > 0 {
            return;
        }
        if state.status.can_transition_to(&StoreStatus::Ready) {
            state.status = StoreStatus::Ready;
        }
    }

    fn record_failure(&self, error: WishlistError) -> WishlistError {
        self.write_state().last_error = Some(error.clone());
        error
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
