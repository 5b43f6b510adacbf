//! Query criteria types
//!
//! A [`Criterion`] is a single `field operator value` predicate. A
//! [`CriteriaSet`] is the normalized form the query compiler consumes: an
//! ordered predicate list plus the pagination and ordering control values
//! extracted from the caller's input. [`Criteria`] is the caller-facing
//! input, which keeps the historical polymorphic surface (raw clause, JSON
//! object, list of predicates) as an explicit tagged enum.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DEFAULT_MAX_RESULTS, DEFAULT_START_POSITION};

/// Comparison operator in a query predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "LIKE")]
    Like,
}

impl Operator {
    /// Query-language token for this operator
    pub fn token(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::In => "IN",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::Like => "LIKE",
        }
    }

    /// Parse an operator token. Word operators are matched
    /// case-insensitively.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "=" => Some(Self::Equals),
            "<" => Some(Self::LessThan),
            ">" => Some(Self::GreaterThan),
            "<=" => Some(Self::LessOrEqual),
            ">=" => Some(Self::GreaterOrEqual),
            t if t.eq_ignore_ascii_case("in") => Some(Self::In),
            t if t.eq_ignore_ascii_case("like") => Some(Self::Like),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Scalar literal usable on the value side of a predicate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Convert a scalar JSON value. Returns `None` for null, objects and
    /// arrays.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Value side of a criterion: a scalar or an ordered list of scalars
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CriterionValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl CriterionValue {
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Convert a JSON value: scalars map to [`CriterionValue::Scalar`],
    /// arrays of scalars to [`CriterionValue::List`]. Null, objects and
    /// nested arrays are rejected.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => {
                let scalars =
                    items.iter().map(Scalar::from_json).collect::<Option<Vec<Scalar>>>()?;
                Some(Self::List(scalars))
            }
            other => Scalar::from_json(other).map(Self::Scalar),
        }
    }
}

impl From<Scalar> for CriterionValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<bool> for CriterionValue {
    fn from(value: bool) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i64> for CriterionValue {
    fn from(value: i64) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<u32> for CriterionValue {
    fn from(value: u32) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<&str> for CriterionValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<String> for CriterionValue {
    fn from(value: String) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<Vec<Scalar>> for CriterionValue {
    fn from(values: Vec<Scalar>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for CriterionValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(Scalar::from).collect())
    }
}

impl From<Vec<String>> for CriterionValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values.into_iter().map(Scalar::from).collect())
    }
}

impl From<Vec<i64>> for CriterionValue {
    fn from(values: Vec<i64>) -> Self {
        Self::List(values.into_iter().map(Scalar::from).collect())
    }
}

/// Single `field operator value` predicate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Criterion {
    pub field: String,
    pub value: CriterionValue,
    pub operator: Operator,
}

impl Criterion {
    /// Create a predicate with the default operator: `IN` when the value is
    /// a list, `=` otherwise.
    pub fn new(field: impl Into<String>, value: impl Into<CriterionValue>) -> Self {
        let value = value.into();
        let operator = Self::default_operator(&value);
        Self { field: field.into(), value, operator }
    }

    /// Override the operator
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    /// Default operator for a value of the given shape
    pub fn default_operator(value: &CriterionValue) -> Operator {
        if value.is_list() {
            Operator::In
        } else {
            Operator::Equals
        }
    }
}

/// Normalized criteria: ordered predicates plus control parameters
///
/// Constructed fresh per call by the normalizer and treated as immutable once
/// compiled; the pagination driver derives a new set per page via
/// [`CriteriaSet::next_page`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriteriaSet {
    /// Predicates in caller order, ANDed together by the compiler
    pub predicates: Vec<Criterion>,
    /// Pre-formed clause body (raw-string input form). When set, the
    /// predicate list is empty and the caller owns syntax and escaping.
    pub clause: Option<String>,
    /// Page size; defaults to [`DEFAULT_MAX_RESULTS`]
    pub limit: Option<u32>,
    /// 1-based start position; defaults to [`DEFAULT_START_POSITION`]
    pub offset: Option<u32>,
    /// Ascending order field
    pub asc: Option<String>,
    /// Descending order field
    pub desc: Option<String>,
    /// Fetch every page transparently
    pub fetch_all: bool,
    /// Compile to a count-selection instead of row-selection
    pub count: bool,
}

impl CriteriaSet {
    /// Wrap a pre-formed clause body, prefixing a leading space if absent
    pub fn from_clause(clause: &str) -> Self {
        let clause = if clause.starts_with(' ') {
            clause.to_string()
        } else {
            format!(" {clause}")
        };
        Self { clause: Some(clause), ..Self::default() }
    }

    /// Resolved page size
    pub fn limit_or_default(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_MAX_RESULTS)
    }

    /// Resolved start position
    pub fn offset_or_default(&self) -> u32 {
        self.offset.unwrap_or(DEFAULT_START_POSITION)
    }

    /// Derive the criteria set for the page starting at `offset`
    pub fn next_page(&self, offset: u32) -> Self {
        Self { offset: Some(offset), ..self.clone() }
    }
}

/// Caller-facing filter input
///
/// The historical client accepted a string, a key/value map, or a list of
/// maps and explicit predicates; this enum keeps that surface while making
/// each form explicit.
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    /// Pre-formed clause body, passed through without field or operator
    /// extraction
    Clause(String),
    /// JSON-shaped input: an object, an array of objects, or a string.
    /// Objects carrying both `field` and `value` keys are explicit
    /// predicates; any other object expands one criterion per key.
    Json(Value),
    /// Explicit ordered predicates
    List(Vec<Criterion>),
}

impl Criteria {
    /// Match-everything criteria
    pub fn none() -> Self {
        Self::List(Vec::new())
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&str> for Criteria {
    fn from(clause: &str) -> Self {
        Self::Clause(clause.to_string())
    }
}

impl From<String> for Criteria {
    fn from(clause: String) -> Self {
        Self::Clause(clause)
    }
}

impl From<Value> for Criteria {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Vec<Criterion>> for Criteria {
    fn from(list: Vec<Criterion>) -> Self {
        Self::List(list)
    }
}

impl From<Criterion> for Criteria {
    fn from(criterion: Criterion) -> Self {
        Self::List(vec![criterion])
    }
}

impl From<()> for Criteria {
    fn from(_: ()) -> Self {
        Self::none()
    }
}
