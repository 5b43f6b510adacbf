//! Query compiler
//!
//! Renders a [`CriteriaSet`] into the service's query language and escapes
//! the result for transport. Compilation is pure: the same set always yields
//! the same string.

use ledgerlink_domain::{CriteriaSet, Criterion, CriterionValue, Scalar};

/// Compile a criteria set into the escaped query string sent on the wire
pub fn compile(entity: &str, criteria: &CriteriaSet) -> String {
    escape_query(&render(entity, criteria))
}

/// Render a criteria set into the readable (unescaped) query string
pub fn render(entity: &str, criteria: &CriteriaSet) -> String {
    let mut query = if criteria.count {
        format!("select count(*) from {entity}")
    } else {
        format!("select * from {entity}")
    };

    if let Some(clause) = &criteria.clause {
        query.push_str(clause);
    } else if !criteria.predicates.is_empty() {
        query.push_str(" where ");
        for (i, predicate) in criteria.predicates.iter().enumerate() {
            if i > 0 {
                query.push_str(" and ");
            }
            render_predicate(&mut query, predicate);
        }
    }

    if let Some(field) = &criteria.asc {
        query.push_str(&format!(" orderby {field} asc"));
    }
    if let Some(field) = &criteria.desc {
        query.push_str(&format!(" orderby {field} desc"));
    }

    query.push_str(&format!(
        " startposition {} maxresults {}",
        criteria.offset_or_default(),
        criteria.limit_or_default()
    ));
    query
}

fn render_predicate(out: &mut String, criterion: &Criterion) {
    out.push_str(&criterion.field);
    out.push(' ');
    out.push_str(criterion.operator.token());
    out.push(' ');
    render_value(out, &criterion.value);
}

fn render_value(out: &mut String, value: &CriterionValue) {
    match value {
        CriterionValue::Scalar(scalar) => render_scalar(out, scalar),
        CriterionValue::List(scalars) => {
            out.push('(');
            for (i, scalar) in scalars.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render_scalar(out, scalar);
            }
            out.push(')');
        }
    }
}

fn render_scalar(out: &mut String, scalar: &Scalar) {
    match scalar {
        // string literals are single-quoted, embedded quotes escaped
        Scalar::Text(text) => {
            out.push('\'');
            out.push_str(&text.replace('\'', "\\'"));
            out.push('\'');
        }
        Scalar::Number(n) => out.push_str(&n.to_string()),
        Scalar::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
    }
}

/// Escape a rendered query for use as a URL query-parameter value.
///
/// Substitutions run as a single pass so the `%` emitted by one substitution
/// is never re-escaped by a later one.
pub fn escape_query(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '\'' => out.push_str("%27"),
            '=' => out.push_str("%3D"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            '&' => out.push_str("%26"),
            '#' => out.push_str("%23"),
            '\\' => out.push_str("%5C"),
            '+' => out.push_str("%2B"),
            _ => out.push(ch),
        }
    }
    out
}
