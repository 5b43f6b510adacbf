//! Criteria normalizer
//!
//! Converts the caller-facing [`Criteria`] forms into one canonical
//! [`CriteriaSet`]: an ordered predicate list plus the control parameters
//! (`limit`, `offset`, `asc`, `desc`, `fetchall`, `count`) extracted from
//! reserved pseudo-fields. Reserved fields match case-insensitively and the
//! last occurrence wins. The raw-clause form bypasses extraction entirely.

use ledgerlink_domain::{
    Criteria, CriteriaSet, Criterion, CriterionValue, LedgerLinkError, Operator, Result, Scalar,
};
use serde_json::{Map, Value};

/// Normalize caller-supplied criteria into a [`CriteriaSet`]
///
/// # Errors
///
/// Returns `InvalidInput` for values that cannot appear in a predicate
/// (null, nested objects or arrays), non-object array elements, unknown
/// operator tokens, and malformed control values.
pub fn normalize(criteria: &Criteria) -> Result<CriteriaSet> {
    match criteria {
        Criteria::Clause(clause) => Ok(CriteriaSet::from_clause(clause)),
        Criteria::List(list) => collect(list.iter().cloned()),
        Criteria::Json(Value::String(clause)) => Ok(CriteriaSet::from_clause(clause)),
        Criteria::Json(value) => collect(flatten_json(value)?.into_iter()),
    }
}

/// Fold predicates into a set, routing reserved pseudo-fields to their
/// control slots
fn collect(criteria: impl Iterator<Item = Criterion>) -> Result<CriteriaSet> {
    let mut set = CriteriaSet::default();
    for criterion in criteria {
        match criterion.field.to_ascii_lowercase().as_str() {
            "limit" => set.limit = Some(positive_int("limit", &criterion.value)?),
            "offset" => set.offset = Some(positive_int("offset", &criterion.value)?),
            "asc" => set.asc = Some(field_name("asc", &criterion.value)?),
            "desc" => set.desc = Some(field_name("desc", &criterion.value)?),
            "fetchall" => set.fetch_all = flag("fetchall", &criterion.value)?,
            "count" => set.count = flag("count", &criterion.value)?,
            _ => set.predicates.push(criterion),
        }
    }
    Ok(set)
}

/// Expand a JSON object or array of objects into ordered predicates
fn flatten_json(value: &Value) -> Result<Vec<Criterion>> {
    match value {
        Value::Object(map) => object_criteria(map),
        Value::Array(items) => {
            let mut flattened = Vec::new();
            for item in items {
                let map = item.as_object().ok_or_else(|| {
                    LedgerLinkError::InvalidInput(
                        "criteria array elements must be objects".to_string(),
                    )
                })?;
                flattened.extend(object_criteria(map)?);
            }
            Ok(flattened)
        }
        _ => Err(LedgerLinkError::InvalidInput(
            "criteria must be a string, an object, or an array of objects".to_string(),
        )),
    }
}

/// One object: either an explicit `{field, value, operator}` predicate or a
/// field→value map expanding one criterion per key, in insertion order
fn object_criteria(map: &Map<String, Value>) -> Result<Vec<Criterion>> {
    if map.contains_key("field") && map.contains_key("value") {
        return Ok(vec![explicit_criterion(map)?]);
    }

    let mut criteria = Vec::with_capacity(map.len());
    for (field, value) in map {
        let value = CriterionValue::from_json(value).ok_or_else(|| {
            LedgerLinkError::InvalidInput(format!(
                "unsupported criteria value for field `{field}`"
            ))
        })?;
        criteria.push(Criterion::new(field.clone(), value));
    }
    Ok(criteria)
}

fn explicit_criterion(map: &Map<String, Value>) -> Result<Criterion> {
    let field = map
        .get("field")
        .and_then(Value::as_str)
        .ok_or_else(|| LedgerLinkError::InvalidInput("criterion field must be a string".into()))?;
    let value = map.get("value").and_then(CriterionValue::from_json).ok_or_else(|| {
        LedgerLinkError::InvalidInput(format!("unsupported criteria value for field `{field}`"))
    })?;

    let operator = match map.get("operator") {
        None => Criterion::default_operator(&value),
        Some(op) => {
            let token = op.as_str().ok_or_else(|| {
                LedgerLinkError::InvalidInput("criterion operator must be a string".into())
            })?;
            Operator::parse(token).ok_or_else(|| {
                LedgerLinkError::InvalidInput(format!("unknown operator `{token}`"))
            })?
        }
    };

    Ok(Criterion { field: field.to_string(), value, operator })
}

fn positive_int(name: &str, value: &CriterionValue) -> Result<u32> {
    if let CriterionValue::Scalar(Scalar::Number(n)) = value {
        if let Some(v) = n.as_u64() {
            if v > 0 && v <= u64::from(u32::MAX) {
                #[allow(clippy::cast_possible_truncation)]
                return Ok(v as u32);
            }
        }
    }
    Err(LedgerLinkError::InvalidInput(format!("`{name}` must be a positive integer")))
}

fn field_name(name: &str, value: &CriterionValue) -> Result<String> {
    match value {
        CriterionValue::Scalar(Scalar::Text(field)) if !field.is_empty() => Ok(field.clone()),
        _ => Err(LedgerLinkError::InvalidInput(format!("`{name}` must name a field"))),
    }
}

fn flag(name: &str, value: &CriterionValue) -> Result<bool> {
    match value {
        CriterionValue::Scalar(Scalar::Bool(b)) => Ok(*b),
        _ => Err(LedgerLinkError::InvalidInput(format!("`{name}` must be a boolean"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn single_field_map_becomes_equals_criterion() {
        let set = normalize(&Criteria::Json(json!({"AccountType": "Expense"}))).unwrap();

        assert_eq!(set.predicates.len(), 1);
        assert_eq!(set.predicates[0].field, "AccountType");
        assert_eq!(set.predicates[0].operator, Operator::Equals);
        assert_eq!(set.predicates[0].value, CriterionValue::from("Expense"));
    }

    #[test]
    fn multi_field_map_expands_in_order() {
        let set = normalize(&Criteria::Json(json!({
            "AccountType": "Expense",
            "Active": true,
        })))
        .unwrap();

        let fields: Vec<&str> = set.predicates.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, ["AccountType", "Active"]);
    }

    #[test]
    fn list_value_defaults_to_in_operator() {
        let set = normalize(&Criteria::Json(json!({"Id": ["1", "2", "3"]}))).unwrap();
        assert_eq!(set.predicates[0].operator, Operator::In);
    }

    #[test]
    fn explicit_triple_respects_operator() {
        let set = normalize(&Criteria::Json(json!({
            "field": "MetaData.LastUpdatedTime",
            "value": "2024-03-01",
            "operator": ">"
        })))
        .unwrap();

        assert_eq!(set.predicates.len(), 1);
        assert_eq!(set.predicates[0].operator, Operator::GreaterThan);
    }

    #[test]
    fn reserved_fields_move_to_control_slots() {
        let set = normalize(&Criteria::Json(json!([
            {"field": "limit", "value": 5},
            {"field": "offset", "value": 10},
            {"Name": "Bob"},
        ])))
        .unwrap();

        assert_eq!(set.limit, Some(5));
        assert_eq!(set.offset, Some(10));
        assert_eq!(set.predicates.len(), 1);
        assert_eq!(set.predicates[0].field, "Name");
        assert_eq!(set.predicates[0].value, CriterionValue::from("Bob"));
    }

    #[test]
    fn reserved_fields_match_case_insensitively() {
        let set = normalize(&Criteria::Json(json!([
            {"field": "fetchAll", "value": true},
            {"field": "Limit", "value": 50},
            {"field": "DESC", "value": "MetaData.LastUpdatedTime"},
        ])))
        .unwrap();

        assert!(set.fetch_all);
        assert_eq!(set.limit, Some(50));
        assert_eq!(set.desc.as_deref(), Some("MetaData.LastUpdatedTime"));
        assert!(set.predicates.is_empty());
    }

    #[test]
    fn repeated_control_fields_last_one_wins() {
        let set = normalize(&Criteria::Json(json!([
            {"field": "limit", "value": 5},
            {"field": "limit", "value": 25},
        ])))
        .unwrap();

        assert_eq!(set.limit, Some(25));
    }

    #[test]
    fn count_switches_selection_and_is_stripped() {
        let set = normalize(&Criteria::Json(json!({"count": true, "Active": true}))).unwrap();

        assert!(set.count);
        assert_eq!(set.predicates.len(), 1);
        assert_eq!(set.predicates[0].field, "Active");
    }

    #[test]
    fn clause_input_bypasses_extraction() {
        let set = normalize(&"where Name = 'Bob' and limit = 3".into()).unwrap();

        assert_eq!(set.clause.as_deref(), Some(" where Name = 'Bob' and limit = 3"));
        assert!(set.predicates.is_empty());
        assert_eq!(set.limit, None);
    }

    #[test]
    fn json_string_is_treated_as_clause() {
        let set = normalize(&Criteria::Json(json!(" where Active = true"))).unwrap();
        assert_eq!(set.clause.as_deref(), Some(" where Active = true"));
    }

    #[test]
    fn typed_list_goes_through_extraction_too() {
        let set = normalize(&Criteria::List(vec![
            Criterion::new("fetchAll", true),
            Criterion::new("DisplayName", "Kitchen"),
        ]))
        .unwrap();

        assert!(set.fetch_all);
        assert_eq!(set.predicates.len(), 1);
    }

    #[test]
    fn rejects_nested_values() {
        let err = normalize(&Criteria::Json(json!({"Ref": {"value": "1"}}))).unwrap_err();
        assert!(matches!(err, LedgerLinkError::InvalidInput(_)));
    }

    #[test]
    fn rejects_non_object_array_elements() {
        let err = normalize(&Criteria::Json(json!(["Name"]))).unwrap_err();
        assert!(matches!(err, LedgerLinkError::InvalidInput(_)));
    }

    #[test]
    fn rejects_invalid_control_values() {
        assert!(normalize(&Criteria::Json(json!({"limit": 0}))).is_err());
        assert!(normalize(&Criteria::Json(json!({"limit": -5}))).is_err());
        assert!(normalize(&Criteria::Json(json!({"offset": "ten"}))).is_err());
        assert!(normalize(&Criteria::Json(json!({"fetchall": "yes"}))).is_err());
        assert!(normalize(&Criteria::Json(json!({"asc": 7}))).is_err());
    }

    #[test]
    fn rejects_unknown_operator() {
        let err = normalize(&Criteria::Json(json!({
            "field": "Name",
            "value": "Bob",
            "operator": "BETWEEN"
        })))
        .unwrap_err();
        assert!(matches!(err, LedgerLinkError::InvalidInput(_)));
    }
}
