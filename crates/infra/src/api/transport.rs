//! REST transport
//!
//! Implements `ledgerlink-core`'s [`ApiTransport`] port on top of the
//! retrying [`HttpClient`]: URL assembly, bearer authentication, status
//! mapping, and JSON decoding.

use std::sync::Arc;

use async_trait::async_trait;
use ledgerlink_core::{ApiTransport, Verb};
use ledgerlink_domain::{ApiConfig, LedgerLinkError, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::auth::AccessTokenProvider;
use crate::http::HttpClient;

/// Transport performing authenticated JSON requests against the service
pub struct RestTransport {
    http: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    config: ApiConfig,
}

impl RestTransport {
    pub fn new(http: HttpClient, auth: Arc<dyn AccessTokenProvider>, config: ApiConfig) -> Self {
        Self { http, auth, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Assemble the full request URL.
    ///
    /// Query-pair values are appended verbatim: the query compiler escapes
    /// its own parameter, and re-encoding here would corrupt it. The
    /// configured minor version rides along on every request.
    fn url_for(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.config.endpoint(), path);
        let mut separator = '?';
        for (key, value) in query {
            url.push(separator);
            url.push_str(key);
            url.push('=');
            url.push_str(value);
            separator = '&';
        }
        if let Some(minor_version) = &self.config.minor_version {
            url.push(separator);
            url.push_str("minorversion=");
            url.push_str(minor_version);
        }
        url
    }
}

#[async_trait]
impl ApiTransport for RestTransport {
    async fn request(
        &self,
        verb: Verb,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.url_for(path, query);
        let token = self.auth.access_token().await?;
        let method = match verb {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
        };
        debug!(verb = verb.as_str(), %url, "invoking endpoint");

        let mut request = self
            .http
            .request(method, &url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, &url, &body));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| LedgerLinkError::Network(format!("failed to decode response body: {err}")))
    }
}

/// Map a non-success status to the domain error taxonomy, carrying the raw
/// body so callers see the error untouched.
fn map_status(status: StatusCode, url: &str, body: &str) -> LedgerLinkError {
    let message = if body.is_empty() {
        format!("{url} returned status {status}")
    } else {
        format!("{url} returned status {status}: {body}")
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LedgerLinkError::Auth(message),
        StatusCode::NOT_FOUND => LedgerLinkError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => LedgerLinkError::RateLimited(message),
        s if s.is_server_error() => LedgerLinkError::Service(message),
        s if s.is_client_error() => LedgerLinkError::InvalidInput(message),
        _ => LedgerLinkError::Network(message),
    }
}
