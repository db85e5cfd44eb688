use crate::core::types::{Document, Value};
use crate::query::ast::{Clause, Operator, Query};

/// Document matcher - evaluates a clause list against a materialized document
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentMatcher;

impl DocumentMatcher {
    pub fn new() -> Self {
        DocumentMatcher
    }

    /// True when every clause holds for `doc`.
    pub fn matches(&self, query: &Query, doc: &Document) -> bool {
        self.matches_all(&query.clauses, doc)
    }

    pub fn matches_all(&self, clauses: &[Clause], doc: &Document) -> bool {
        clauses.iter().all(|clause| self.matches_clause(clause, doc))
    }

    pub fn matches_clause(&self, clause: &Clause, doc: &Document) -> bool {
        let value = match doc.get_path(&clause.path) {
            Some(value) => value,
            None => return false,
        };

        // Null and containers are never comparable
        if matches!(value, Value::Null | Value::Object(_) | Value::Array(_)) {
            return false;
        }

        match clause.op {
            Operator::Eq => matches_eq(value, &clause.value),
            Operator::Lt => compare_numeric(value, &clause.value).is_some_and(|(l, r)| l < r),
            Operator::Gt => compare_numeric(value, &clause.value).is_some_and(|(l, r)| l > r),
        }
    }
}

fn matches_eq(value: &Value, literal: &str) -> bool {
    value.leaf_text().is_some_and(|text| text == literal)
}

/// Both sides as f64, or `None` when either side is not numeric.
fn compare_numeric(value: &Value, literal: &str) -> Option<(f64, f64)> {
    let right = literal.parse::<f64>().ok()?;
    let left = value
        .as_f64()
        .or_else(|| value.as_str()?.parse::<f64>().ok())?;
    Some((left, right))
}
