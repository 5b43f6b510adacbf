//! Pagination driver
//!
//! Issues compiled queries through the [`ApiTransport`] port and, when
//! fetch-all is requested, walks result pages sequentially until a page
//! comes back smaller than the page size. Pages are never fetched
//! concurrently: the offset for page N+1 depends on page N. Errors abort the
//! whole operation; no partial results are returned.

use std::sync::Arc;

use ledgerlink_domain::{
    Criteria, CriteriaSet, Fault, LedgerLinkError, QueryResult, Result,
};
use serde_json::Value;
use tracing::debug;

use super::compiler::compile;
use super::criteria::normalize;
use super::ports::{ApiTransport, Verb};

/// Query service driving compilation and pagination over a transport
pub struct QueryService {
    transport: Arc<dyn ApiTransport>,
}

impl QueryService {
    /// Create a new query service
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Run a query for the given entity type.
    ///
    /// Honors a `fetchall` control field in the criteria; otherwise returns
    /// the single requested page.
    pub async fn query(&self, entity: &str, criteria: &Criteria) -> Result<QueryResult> {
        let set = normalize(criteria)?;
        self.run(entity, set).await
    }

    /// Run a query and transparently fetch every page of the result set
    pub async fn query_all(&self, entity: &str, criteria: &Criteria) -> Result<QueryResult> {
        let mut set = normalize(criteria)?;
        set.fetch_all = true;
        self.run(entity, set).await
    }

    /// Run a count-selection for the given entity type
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the response carries no `totalCount`.
    pub async fn count(&self, entity: &str, criteria: &Criteria) -> Result<u64> {
        let mut set = normalize(criteria)?;
        set.count = true;
        set.fetch_all = false;

        let body = self.fetch_page(entity, &set).await?;
        let response = query_response(&body)?;
        response.get("totalCount").and_then(Value::as_u64).ok_or_else(|| {
            LedgerLinkError::Internal("count response missing totalCount".to_string())
        })
    }

    async fn run(&self, entity: &str, mut set: CriteriaSet) -> Result<QueryResult> {
        let fetch_all = set.fetch_all;
        let limit = set.limit_or_default();
        let mut offset = set.offset_or_default();

        let mut entities = Vec::new();
        let mut total: u64 = 0;
        let mut envelope: Option<Value> = None;

        loop {
            let body = self.fetch_page(entity, &set).await?;
            let page = Page::decode(entity, &body)?;

            if !fetch_all {
                return Ok(QueryResult {
                    max_results: page.max_results,
                    entities: page.entities,
                    envelope: body,
                });
            }

            total += page.max_results;
            entities.extend(page.entities);
            if envelope.is_none() {
                envelope = Some(body);
            }

            // A full page implies more rows may exist; anything smaller is
            // the last page.
            if page.max_results == u64::from(limit) {
                offset += limit;
                set = set.next_page(offset);
                debug!(entity, offset, "fetching next result page");
                continue;
            }

            debug!(entity, total, "pagination complete");
            return Ok(QueryResult {
                max_results: total,
                entities,
                envelope: envelope.unwrap_or(Value::Null),
            });
        }
    }

    async fn fetch_page(&self, entity: &str, set: &CriteriaSet) -> Result<Value> {
        let query = compile(entity, set);
        let body = self
            .transport
            .request(Verb::Get, "/query", &[("query", query)], None)
            .await?;

        if let Some(fault) = Fault::from_body(&body) {
            return Err(LedgerLinkError::Fault(fault));
        }
        Ok(body)
    }
}

/// One decoded result page
struct Page {
    max_results: u64,
    entities: Vec<Value>,
}

impl Page {
    /// Decode the entity array and result count for a page.
    ///
    /// The entity key is matched case-insensitively against the queried
    /// entity name. Empty result sets omit both the entity key and
    /// `maxResults`.
    fn decode(entity: &str, body: &Value) -> Result<Self> {
        let response = query_response(body)?;
        let max_results = response.get("maxResults").and_then(Value::as_u64).unwrap_or(0);
        let entities = response
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(entity))
            .and_then(|(_, value)| value.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(Self { max_results, entities })
    }
}

fn query_response(body: &Value) -> Result<&serde_json::Map<String, Value>> {
    body.get("QueryResponse").and_then(Value::as_object).ok_or_else(|| {
        LedgerLinkError::Internal("response body missing QueryResponse".to_string())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    /// Transport stub that replays scripted page bodies and records the
    /// query strings it was asked for.
    struct ScriptedTransport {
        pages: Mutex<Vec<Result<Value>>>,
        queries: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(pages: Vec<Result<Value>>) -> Arc<Self> {
            Arc::new(Self { pages: Mutex::new(pages), queries: Mutex::new(Vec::new()) })
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiTransport for ScriptedTransport {
        async fn request(
            &self,
            verb: Verb,
            path: &str,
            query: &[(&str, String)],
            body: Option<&Value>,
        ) -> Result<Value> {
            assert_eq!(verb, Verb::Get);
            assert_eq!(path, "/query");
            assert!(body.is_none());
            self.queries.lock().unwrap().push(query[0].1.clone());

            let mut pages = self.pages.lock().unwrap();
            assert!(!pages.is_empty(), "transport called more times than scripted");
            pages.remove(0)
        }
    }

    fn page(entity_key: &str, rows: &[Value], max_results: u64) -> Value {
        json!({
            "QueryResponse": {
                entity_key: rows,
                "maxResults": max_results,
                "startPosition": 1,
            },
            "time": "2024-06-01T10:00:00.000-07:00"
        })
    }

    #[test]
    fn verb_tokens() {
        assert_eq!(Verb::Get.as_str(), "GET");
        assert_eq!(Verb::Post.as_str(), "POST");
    }

    #[tokio::test]
    async fn single_page_query_issues_one_request() {
        let transport = ScriptedTransport::new(vec![Ok(page(
            "Account",
            &[json!({"Id": "1"}), json!({"Id": "2"})],
            2,
        ))]);
        let service = QueryService::new(transport.clone());

        let result = service
            .query("account", &Criteria::Json(json!({"AccountType": "Expense"})))
            .await
            .unwrap();

        assert_eq!(result.max_results, 2);
        assert_eq!(result.len(), 2);
        assert_eq!(transport.queries().len(), 1);
        // entity key matched case-insensitively against "account"
        assert_eq!(result.entities[0]["Id"], "1");
    }

    #[tokio::test]
    async fn full_page_without_fetch_all_stops_after_one_request() {
        let transport = ScriptedTransport::new(vec![Ok(page(
            "Customer",
            &[json!({"Id": "1"}), json!({"Id": "2"})],
            2,
        ))]);
        let service = QueryService::new(transport.clone());

        let result = service
            .query("customer", &Criteria::Json(json!({"limit": 2})))
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(transport.queries().len(), 1);
    }

    #[tokio::test]
    async fn fetch_all_concatenates_pages_and_advances_offset() {
        let transport = ScriptedTransport::new(vec![
            Ok(page("Customer", &[json!({"Id": "1"}), json!({"Id": "2"})], 2)),
            Ok(page("Customer", &[json!({"Id": "3"})], 1)),
        ]);
        let service = QueryService::new(transport.clone());

        let result = service
            .query(
                "customer",
                &Criteria::Json(json!([
                    {"field": "fetchAll", "value": true},
                    {"field": "limit", "value": 2},
                ])),
            )
            .await
            .unwrap();

        assert_eq!(result.max_results, 3);
        assert_eq!(result.len(), 3);
        let ids: Vec<&str> =
            result.entities.iter().map(|e| e["Id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["1", "2", "3"]);

        let queries = transport.queries();
        assert_eq!(queries.len(), 2);
        assert!(queries[0].contains("startposition 1 maxresults 2"));
        assert!(queries[1].contains("startposition 3 maxresults 2"));
    }

    #[tokio::test]
    async fn fetch_all_terminates_on_empty_page() {
        let transport = ScriptedTransport::new(vec![
            Ok(page("Invoice", &[json!({"Id": "1"})], 1)),
        ]);
        let service = QueryService::new(transport.clone());

        let result = service
            .query_all("invoice", &Criteria::Json(json!({"limit": 1000})))
            .await
            .unwrap();
        // one short page: no further requests scripted, none issued
        assert_eq!(result.len(), 1);
        assert_eq!(transport.queries().len(), 1);
    }

    #[tokio::test]
    async fn fetch_all_terminates_when_entity_key_is_absent() {
        let transport = ScriptedTransport::new(vec![Ok(json!({
            "QueryResponse": {},
            "time": "2024-06-01T10:00:00.000-07:00"
        }))]);
        let service = QueryService::new(transport);

        let result = service.query_all("vendor", &Criteria::none()).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(result.max_results, 0);
    }

    #[tokio::test]
    async fn error_page_fails_the_whole_operation() {
        let transport = ScriptedTransport::new(vec![
            Ok(page("Bill", &[json!({"Id": "1"}), json!({"Id": "2"})], 2)),
            Err(LedgerLinkError::Network("connection reset".to_string())),
        ]);
        let service = QueryService::new(transport.clone());

        let err = service
            .query(
                "bill",
                &Criteria::Json(json!([
                    {"field": "fetchAll", "value": true},
                    {"field": "limit", "value": 2},
                ])),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerLinkError::Network(_)));
        assert_eq!(transport.queries().len(), 2);
    }

    #[tokio::test]
    async fn fault_body_aborts_pagination() {
        let transport = ScriptedTransport::new(vec![Ok(json!({
            "Fault": {
                "type": "ValidationFault",
                "Error": [{"Message": "Invalid query", "code": "4000"}]
            }
        }))]);
        let service = QueryService::new(transport);

        let err = service.query_all("payment", &Criteria::none()).await.unwrap_err();
        match err {
            LedgerLinkError::Fault(fault) => {
                assert_eq!(fault.errors[0].code.as_deref(), Some("4000"));
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let transport = ScriptedTransport::new(vec![Ok(json!({"unexpected": true}))]);
        let service = QueryService::new(transport);

        let err = service.query("account", &Criteria::none()).await.unwrap_err();
        assert!(matches!(err, LedgerLinkError::Internal(_)));
    }

    #[tokio::test]
    async fn count_reads_total_count() {
        let transport = ScriptedTransport::new(vec![Ok(json!({
            "QueryResponse": {"totalCount": 17}
        }))]);
        let service = QueryService::new(transport.clone());

        let total = service
            .count("purchase", &Criteria::Json(json!({"Active": true})))
            .await
            .unwrap();

        assert_eq!(total, 17);
        assert!(transport.queries()[0].starts_with("select count(*) from purchase"));
    }

    #[tokio::test]
    async fn count_without_total_count_is_an_error() {
        let transport = ScriptedTransport::new(vec![Ok(json!({"QueryResponse": {}}))]);
        let service = QueryService::new(transport);

        let err = service.count("purchase", &Criteria::none()).await.unwrap_err();
        assert!(matches!(err, LedgerLinkError::Internal(_)));
    }
}
