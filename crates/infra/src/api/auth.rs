//! API authentication port
//!
//! Token acquisition and refresh are owned by the embedding application.
//! The client only needs a valid bearer token per request, which it obtains
//! through the [`AccessTokenProvider`] trait.

use async_trait::async_trait;
use ledgerlink_domain::{AuthConfig, LedgerLinkError, Result};

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
/// Implementations backed by a token-refresh service should return a token
/// that is valid at call time.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    async fn access_token(&self) -> Result<String>;
}

/// Provider returning a fixed token for the lifetime of the client
#[derive(Debug)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    /// Build a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns `Auth` if no access token is configured.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        match &config.access_token {
            Some(token) if !token.is_empty() => Ok(Self::new(token.clone())),
            _ => Err(LedgerLinkError::Auth("no access token configured".to_string())),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_provider_returns_its_token() {
        let provider = StaticTokenProvider::new("abc123");
        assert_eq!(provider.access_token().await.unwrap(), "abc123");
    }

    #[test]
    fn from_config_requires_a_token() {
        let err = StaticTokenProvider::from_config(&AuthConfig::default()).unwrap_err();
        assert!(matches!(err, LedgerLinkError::Auth(_)));

        let config = AuthConfig { access_token: Some("tok".to_string()) };
        assert!(StaticTokenProvider::from_config(&config).is_ok());
    }
}
