//! Data types shared by the query engine and the API client

pub mod criteria;
pub mod fault;
pub mod query;

pub use criteria::{Criteria, CriteriaSet, Criterion, CriterionValue, Operator, Scalar};
pub use fault::{Fault, FaultError};
pub use query::QueryResult;
