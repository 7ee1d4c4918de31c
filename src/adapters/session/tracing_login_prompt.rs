//! Login prompt that records requests instead of driving a UI.
//!
//! Hosts without their own sign-in screen (the CLI, tests) use this; a
//! browser host would redirect to its login page instead.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::ports::{LoginPrompt, LoginReason};

#[derive(Debug, Default)]
pub struct TracingLoginPrompt {
    prompts: AtomicUsize,
    last_reason: Mutex<Option<LoginReason>>,
}

impl TracingLoginPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a login was requested.
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    pub fn last_reason(&self) -> Option<LoginReason> {
        *self.last_reason.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LoginPrompt for TracingLoginPrompt {
    fn require_login(&self, reason: LoginReason) {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        *self.last_reason.lock().unwrap_or_else(PoisonError::into_inner) = Some(reason);
        tracing::info!(?reason, "Login required to manage the wishlist");
    }
}
