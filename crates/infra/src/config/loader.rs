//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `LEDGERLINK_COMPANY_ID`: Company identifier (required)
//! - `LEDGERLINK_ENVIRONMENT`: `production` or `sandbox` (default: sandbox)
//! - `LEDGERLINK_BASE_URL`: Explicit base URL override
//! - `LEDGERLINK_MINOR_VERSION`: Minor version forwarded on every request
//! - `LEDGERLINK_TIMEOUT_SECONDS`: Request timeout in seconds
//! - `LEDGERLINK_ACCESS_TOKEN`: Static bearer token
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./ledgerlink.toml` or `./ledgerlink.json`
//! 2. `./config.toml` or `./config.json`
//! 3. The same names in the parent directory

use std::path::{Path, PathBuf};

use ledgerlink_domain::{
    ApiConfig, AuthConfig, Config, Environment, LedgerLinkError, Result,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `LedgerLinkError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `LedgerLinkError::Config` if `LEDGERLINK_COMPANY_ID` is missing
/// or any present variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let company_id = env_var("LEDGERLINK_COMPANY_ID")?;

    let environment = match std::env::var("LEDGERLINK_ENVIRONMENT") {
        Ok(value) => value
            .parse::<Environment>()
            .map_err(LedgerLinkError::Config)?,
        Err(_) => Environment::default(),
    };

    let timeout_seconds = match std::env::var("LEDGERLINK_TIMEOUT_SECONDS") {
        Ok(value) => value.parse::<u64>().map_err(|e| {
            LedgerLinkError::Config(format!("Invalid timeout: {e}"))
        })?,
        Err(_) => ledgerlink_domain::constants::DEFAULT_TIMEOUT_SECONDS,
    };

    let api = ApiConfig {
        environment,
        base_url: std::env::var("LEDGERLINK_BASE_URL").ok(),
        company_id,
        minor_version: std::env::var("LEDGERLINK_MINOR_VERSION").ok(),
        timeout_seconds,
    };
    let auth = AuthConfig { access_token: std::env::var("LEDGERLINK_ACCESS_TOKEN").ok() };

    Ok(Config { api, auth })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. The format is
/// detected by file extension (TOML unless the extension is `json`).
///
/// # Errors
/// Returns `LedgerLinkError::Config` if no file is found or the contents do
/// not parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LedgerLinkError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            LedgerLinkError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LedgerLinkError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, dispatching on extension
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(contents)
            .map_err(|e| LedgerLinkError::Config(format!("Invalid JSON config: {e}")))
    } else {
        toml::from_str(contents)
            .map_err(|e| LedgerLinkError::Config(format!("Invalid TOML config: {e}")))
    }
}

fn probe_config_paths() -> Option<PathBuf> {
    let names = ["ledgerlink.toml", "ledgerlink.json", "config.toml", "config.json"];
    let dirs = [PathBuf::from("."), PathBuf::from("..")];

    for dir in &dirs {
        for name in &names {
            let candidate = dir.join(name);
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }
    None
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| LedgerLinkError::Config(format!("Missing environment variable: {name}")))
}
