//! Accounting API client
//!
//! [`LedgerClient`] exposes the generic CRUD primitives every entity type
//! shares, plus the query entry points. The per-entity wrappers in
//! [`super::entities`] are thin delegations to these methods.

use std::sync::Arc;
use std::time::Duration;

use ledgerlink_core::entity::capitalize;
use ledgerlink_core::{QueryService, Verb};
use ledgerlink_domain::{
    ApiConfig, Config, Criteria, Fault, LedgerLinkError, QueryResult, Result,
};
use serde_json::Value;
use tracing::{debug, instrument};

use super::auth::{AccessTokenProvider, StaticTokenProvider};
use super::transport::RestTransport;
use crate::http::HttpClient;

/// Target of a delete operation: an id or a full entity body
///
/// Deleting by id first reads the entity, because the service requires the
/// current body (with its `SyncToken`) on delete.
#[derive(Debug, Clone)]
pub enum DeleteTarget {
    Id(String),
    Entity(Value),
}

impl From<&str> for DeleteTarget {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for DeleteTarget {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<Value> for DeleteTarget {
    fn from(entity: Value) -> Self {
        Self::Entity(entity)
    }
}

/// Client for one company on the accounting service
///
/// Cheap to share behind an `Arc`; every call constructs its own request
/// state, so concurrent calls do not interfere.
pub struct LedgerClient {
    transport: Arc<RestTransport>,
    query: QueryService,
}

impl std::fmt::Debug for LedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerClient").finish_non_exhaustive()
    }
}

impl LedgerClient {
    /// Create a client from endpoint configuration and a token provider
    pub fn new(config: ApiConfig, auth: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        let transport = Arc::new(RestTransport::new(http, auth, config));
        let query = QueryService::new(transport.clone());
        Ok(Self { transport, query })
    }

    /// Create a client from a loaded [`Config`], using its static token
    pub fn from_config(config: &Config) -> Result<Self> {
        let auth = StaticTokenProvider::from_config(&config.auth)?;
        Self::new(config.api.clone(), Arc::new(auth))
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> LedgerClientBuilder {
        LedgerClientBuilder::default()
    }

    /// Create an entity record
    #[instrument(skip(self, body), fields(entity = %entity))]
    pub async fn create(&self, entity: &str, body: &Value) -> Result<Value> {
        let path = format!("/{}", entity.to_lowercase());
        let response = self.checked_request(Verb::Post, &path, &[], Some(body)).await?;
        Ok(unwrap_entity(entity, response))
    }

    /// Read an entity record by id
    #[instrument(skip(self), fields(entity = %entity, id = %id))]
    pub async fn read(&self, entity: &str, id: &str) -> Result<Value> {
        let path = format!("/{}/{}", entity.to_lowercase(), id);
        let response = self.checked_request(Verb::Get, &path, &[], None).await?;
        Ok(unwrap_entity(entity, response))
    }

    /// Update an entity record
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` without issuing a request if the body lacks
    /// `Id` or `SyncToken`; the service rejects such updates.
    #[instrument(skip(self, body), fields(entity = %entity))]
    pub async fn update(&self, entity: &str, body: &Value) -> Result<Value> {
        if !has_field(body, "Id") || !has_field(body, "SyncToken") {
            return Err(LedgerLinkError::InvalidInput(format!(
                "{entity} update requires Id and SyncToken fields"
            )));
        }
        let path = format!("/{}", entity.to_lowercase());
        let response = self
            .checked_request(Verb::Post, &path, &[("operation", "update".to_string())], Some(body))
            .await?;
        Ok(unwrap_entity(entity, response))
    }

    /// Delete an entity record by id or full body
    ///
    /// Passing an id issues a read first and deletes the fetched body.
    #[instrument(skip(self, target), fields(entity = %entity))]
    pub async fn delete(&self, entity: &str, target: impl Into<DeleteTarget>) -> Result<Value> {
        let body = match target.into() {
            DeleteTarget::Entity(body) => body,
            DeleteTarget::Id(id) => {
                debug!(entity, %id, "fetching entity before delete");
                self.read(entity, &id).await?
            }
        };
        let path = format!("/{}", entity.to_lowercase());
        self.checked_request(Verb::Post, &path, &[("operation", "delete".to_string())], Some(&body))
            .await
    }

    /// Run a query for the given entity type
    ///
    /// Criteria may be a raw clause string, JSON-shaped filters, or explicit
    /// predicates; a `fetchall` control field makes the driver walk every
    /// page.
    pub async fn query(&self, entity: &str, criteria: &Criteria) -> Result<QueryResult> {
        self.query.query(entity, criteria).await
    }

    /// Run a query and fetch every page of the result set
    pub async fn query_all(&self, entity: &str, criteria: &Criteria) -> Result<QueryResult> {
        self.query.query_all(entity, criteria).await
    }

    /// Count records matching the criteria
    pub async fn count(&self, entity: &str, criteria: &Criteria) -> Result<u64> {
        self.query.count(entity, criteria).await
    }

    /// Endpoint configuration this client talks to
    pub fn config(&self) -> &ApiConfig {
        self.transport.config()
    }

    /// Issue a request and surface application faults carried in otherwise
    /// successful bodies.
    async fn checked_request(
        &self,
        verb: Verb,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        use ledgerlink_core::ApiTransport;

        let response = self.transport.request(verb, path, query, body).await?;
        if let Some(fault) = Fault::from_body(&response) {
            return Err(LedgerLinkError::Fault(fault));
        }
        Ok(response)
    }
}

/// Builder for [`LedgerClient`]
#[derive(Default)]
pub struct LedgerClientBuilder {
    config: Option<ApiConfig>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl LedgerClientBuilder {
    /// Set the endpoint configuration
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the authentication provider
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Use a fixed access token
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Arc::new(StaticTokenProvider::new(token)));
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns `Config` if the endpoint configuration or auth provider is
    /// missing.
    pub fn build(self) -> Result<LedgerClient> {
        let config = self
            .config
            .ok_or_else(|| LedgerLinkError::Config("endpoint configuration not set".to_string()))?;
        let auth = self
            .auth
            .ok_or_else(|| LedgerLinkError::Config("auth provider not set".to_string()))?;
        LedgerClient::new(config, auth)
    }
}

/// Unwrap the capitalized entity key from a response body, falling back to
/// the whole body when the key is absent.
fn unwrap_entity(entity: &str, mut body: Value) -> Value {
    let key = capitalize(entity);
    if let Some(inner) = body.as_object_mut().and_then(|map| map.remove(&key)) {
        return inner;
    }
    body
}

fn has_field(body: &Value, field: &str) -> bool {
    body.get(field).is_some_and(|v| !v.is_null())
}
