//! Query result envelope

use serde_json::Value;

/// Result of a query call
///
/// Holds the raw decoded response envelope alongside the decoded result
/// count and entity sequence. When the pagination driver fetches every page,
/// `entities` concatenates the pages in page order (order within a page is
/// whatever the service returned) and `max_results` sums the per-page counts;
/// `envelope` is the first page's raw body.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Raw response body of the (first) page
    pub envelope: Value,
    /// Reported result count, summed across pages when fetching all
    pub max_results: u64,
    /// Decoded entity objects in page order
    pub entities: Vec<Value>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }
}
