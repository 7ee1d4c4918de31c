//! In-memory credential store.

use std::sync::{PoisonError, RwLock};

use crate::ports::{AccessToken, CredentialStore};

/// Keeps the current session's access token in memory.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    token: RwLock<Option<AccessToken>>,
}

impl InMemoryCredentialStore {
    /// A store with no session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(AccessToken::new(token))),
        }
    }

    /// Replace the stored token (e.g. after a successful login).
    pub fn set_token(&self, token: AccessToken) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn access_token(&self) -> Option<AccessToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn invalidate(&self) {
        let previous = self
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            tracing::info!("Access token invalidated");
        }
    }
}
