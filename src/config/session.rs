//! Session configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::ports::AccessToken;

/// Credential used for authenticated wishlist calls
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Bearer token; absent means signed out
    pub access_token: Option<Secret<String>>,
}

impl SessionConfig {
    /// The configured token, ignoring blank values.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.access_token
            .as_ref()
            .filter(|token| !token.expose_secret().trim().is_empty())
            .map(|token| AccessToken::from(token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_signed_out() {
        assert!(SessionConfig::default().access_token().is_none());
    }

    #[test]
    fn test_blank_token_is_signed_out() {
        let config = SessionConfig {
            access_token: Some(Secret::new("   ".to_string())),
        };
        assert!(config.access_token().is_none());
    }

    #[test]
    fn test_token_is_exposed_only_through_access_token() {
        let config = SessionConfig {
            access_token: Some(Secret::new("abc123".to_string())),
        };
        assert_eq!(config.access_token().unwrap().expose(), "abc123");
        assert!(!format!("{:?}", config).contains("abc123"));
    }
}
