//! Client configuration
//!
//! Configuration is an explicit struct passed into the client constructor;
//! there is no process-wide mutable endpoint or version state. The query path
//! only ever reads it.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TIMEOUT_SECONDS, PRODUCTION_BASE_URL, SANDBOX_BASE_URL};

/// Target service environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    /// Sandbox companies; the safe default for new integrations
    #[default]
    Sandbox,
}

impl Environment {
    /// Base URL for company-scoped endpoints in this environment
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_BASE_URL,
            Self::Sandbox => SANDBOX_BASE_URL,
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "sandbox" => Ok(Self::Sandbox),
            other => Err(format!("Invalid environment: {other}")),
        }
    }
}

/// API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Environment selecting the default base URL
    #[serde(default)]
    pub environment: Environment,
    /// Explicit base URL override (self-hosted gateways, tests)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Company identifier scoping every request path
    pub company_id: String,
    /// Optional minor version forwarded as a query parameter on every
    /// request
    #[serde(default)]
    pub minor_version: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl ApiConfig {
    /// Configuration for the given environment and company
    pub fn new(environment: Environment, company_id: impl Into<String>) -> Self {
        Self {
            environment,
            base_url: None,
            company_id: company_id.into(),
            minor_version: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Sandbox configuration for the given company
    pub fn sandbox(company_id: impl Into<String>) -> Self {
        Self::new(Environment::Sandbox, company_id)
    }

    /// Production configuration for the given company
    pub fn production(company_id: impl Into<String>) -> Self {
        Self::new(Environment::Production, company_id)
    }

    /// Company-scoped endpoint root, e.g.
    /// `https://.../v3/company/4620816365`
    pub fn endpoint(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or_else(|| self.environment.base_url());
        format!("{}/{}", base.trim_end_matches('/'), self.company_id)
    }
}

/// Authentication configuration
///
/// Token acquisition and refresh are owned by the embedding application;
/// the client only needs a bearer token to attach.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Top-level client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_uses_environment_default() {
        let config = ApiConfig::sandbox("123145");
        assert_eq!(
            config.endpoint(),
            format!("{SANDBOX_BASE_URL}/123145")
        );
    }

    #[test]
    fn endpoint_honors_override_and_trailing_slash() {
        let mut config = ApiConfig::production("42");
        config.base_url = Some("http://localhost:9090/".to_string());
        assert_eq!(config.endpoint(), "http://localhost:9090/42");
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("Production".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("SANDBOX".parse::<Environment>(), Ok(Environment::Sandbox));
        assert!("staging".parse::<Environment>().is_err());
    }
}
