//! Session ports - where the access credential lives and how to ask for a login.
//!
//! The presence of a locally stored credential is the only authentication
//! signal the store checks before a mutating call. Signature and expiry are
//! server concerns.

use secrecy::{ExposeSecret, Secret};
use std::fmt;

/// Bearer credential for the wishlist API. Redacted in `Debug` output.
#[derive(Clone)]
pub struct AccessToken(Secret<String>);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }

    /// Exposes the raw token (for building request headers).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<Secret<String>> for AccessToken {
    fn from(secret: Secret<String>) -> Self {
        Self(secret)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Why the user is being asked to sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginReason {
    /// A mutation was attempted without any stored credential.
    NoSession,
    /// The server rejected the stored credential.
    SessionExpired,
}

/// Holds the credential for the current session.
pub trait CredentialStore: Send + Sync {
    /// The stored credential, if any.
    fn access_token(&self) -> Option<AccessToken>;

    /// Forget the stored credential. Called when the server answers `401`.
    fn invalidate(&self);
}

/// Triggers the "please sign in" flow in whatever UI hosts the store.
pub trait LoginPrompt: Send + Sync {
    fn require_login(&self, reason: LoginReason);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_credential_store_object_safe(_: &dyn CredentialStore) {}

    #[allow(dead_code)]
    fn assert_login_prompt_object_safe(_: &dyn LoginPrompt) {}

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("eyJhbGciOi.secret");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("secret"));
        assert_eq!(token.expose(), "eyJhbGciOi.secret");
    }
}
