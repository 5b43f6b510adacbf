//! Domain constants
//!
//! Centralized location for the constants shared by the query engine and the
//! HTTP client configuration.

// Query pagination defaults (the service caps pages at 1000 rows)
pub const DEFAULT_MAX_RESULTS: u32 = 1000;
pub const DEFAULT_START_POSITION: u32 = 1;

// HTTP client defaults
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

// Service endpoints, selected via `Environment`
pub const PRODUCTION_BASE_URL: &str = "https://books.api.ledgerlink.io/v3/company";
pub const SANDBOX_BASE_URL: &str = "https://sandbox-books.api.ledgerlink.io/v3/company";
