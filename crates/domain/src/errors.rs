//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Fault;

/// Main error type for LedgerLink
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum LedgerLinkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Service error: {0}")]
    Service(String),

    /// Application-level fault carried in an otherwise successful response
    /// body. The decoded fault is propagated untouched.
    #[error("Service fault: {0}")]
    Fault(Fault),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for LedgerLink operations
pub type Result<T> = std::result::Result<T, LedgerLinkError>;
