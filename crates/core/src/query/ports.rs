//! Port interfaces for the query engine
//!
//! These traits define the boundary between the pagination driver and the
//! HTTP infrastructure.

use async_trait::async_trait;
use ledgerlink_domain::Result;
use serde_json::Value;

/// HTTP verbs used against the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Trait for performing authenticated requests against the service
///
/// Implementations attach auth headers and decode the JSON body. Query-pair
/// values are appended to the URL verbatim: the query compiler has already
/// percent-escaped them. Timeouts and cancellation surface as errors from
/// [`ApiTransport::request`]; the driver propagates them opaquely.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Perform a request and return the decoded response body
    async fn request(
        &self,
        verb: Verb,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value>;
}
