//! # Filter Specification
//!
//! Conditions a product document must satisfy to match a query.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use serde_json::Value;

/// Comparison operators for numeric filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CmpOp {
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Equals
    Eq,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
}

impl CmpOp {
    /// Get the canonical opcode name
    pub fn as_str(&self) -> &'static str {
        match self {
            CmpOp::Gt => "gt",
            CmpOp::Gte => "gte",
            CmpOp::Eq => "eq",
            CmpOp::Lt => "lt",
            CmpOp::Lte => "lte",
        }
    }

    /// Evaluate the comparison. NaN bounds compare false for every
    /// operator, so malformed filter values match nothing.
    pub fn eval(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            CmpOp::Gt => lhs > rhs,
            CmpOp::Gte => lhs >= rhs,
            CmpOp::Eq => lhs == rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Lte => lhs <= rhs,
        }
    }
}

/// A single per-field condition
#[derive(Debug, Clone)]
pub enum Condition {
    /// Exact equality against a JSON value
    Equals(Value),

    /// Case-insensitive substring match over a string field
    Contains(Regex),

    /// Numeric comparison map; all entries must hold
    Compare(BTreeMap<CmpOp, f64>),
}

impl Condition {
    /// Check a field value against this condition. A missing field
    /// never matches.
    fn matches(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };

        match self {
            Condition::Equals(expected) => value == expected,
            Condition::Contains(pattern) => {
                value.as_str().is_some_and(|s| pattern.is_match(s))
            }
            Condition::Compare(ops) => value
                .as_f64()
                .is_some_and(|n| ops.iter().all(|(op, bound)| op.eval(n, *bound))),
        }
    }
}

/// Field conditions combined with AND logic. An empty spec matches
/// every document.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    conditions: BTreeMap<String, Condition>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Add an equality condition
    pub fn eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.conditions.insert(field.into(), Condition::Equals(value));
        self
    }

    /// Add a case-insensitive substring condition. The needle is taken
    /// verbatim, not as a pattern.
    pub fn contains(mut self, field: impl Into<String>, needle: &str) -> Self {
        let pattern = RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()
            .expect("escaped literal is a valid pattern");
        self.conditions.insert(field.into(), Condition::Contains(pattern));
        self
    }

    /// Add a numeric comparison. Multiple comparisons on the same field
    /// merge into one operator map, so `price>10,price<100` keeps both
    /// bounds.
    pub fn cmp(mut self, field: impl Into<String>, op: CmpOp, value: f64) -> Self {
        let entry = self
            .conditions
            .entry(field.into())
            .or_insert_with(|| Condition::Compare(BTreeMap::new()));

        match entry {
            Condition::Compare(ops) => {
                ops.insert(op, value);
            }
            other => {
                *other = Condition::Compare(BTreeMap::from([(op, value)]));
            }
        }
        self
    }

    /// Get the condition for a field, if any
    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.conditions.get(field)
    }

    /// Check if a document matches all conditions
    pub fn matches(&self, doc: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(field, cond)| cond.matches(doc.get(field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_opcode_names() {
        assert_eq!(CmpOp::Gt.as_str(), "gt");
        assert_eq!(CmpOp::Gte.as_str(), "gte");
        assert_eq!(CmpOp::Eq.as_str(), "eq");
        assert_eq!(CmpOp::Lt.as_str(), "lt");
        assert_eq!(CmpOp::Lte.as_str(), "lte");
    }

    #[test]
    fn test_empty_spec_matches_everything() {
        let spec = FilterSpec::new();
        assert!(spec.matches(&json!({"name": "anything"})));
        assert!(spec.matches(&json!({})));
    }

    #[test]
    fn test_eq_filter() {
        let spec = FilterSpec::new().eq("company", json!("ikea"));

        assert!(spec.matches(&json!({"company": "ikea"})));
        assert!(!spec.matches(&json!({"company": "liddy"})));
        assert!(!spec.matches(&json!({})));
    }

    #[test]
    fn test_bool_eq_filter() {
        let spec = FilterSpec::new().eq("featured", json!(true));

        assert!(spec.matches(&json!({"featured": true})));
        assert!(!spec.matches(&json!({"featured": false})));
    }

    #[test]
    fn test_contains_is_case_insensitive_substring() {
        let spec = FilterSpec::new().contains("name", "shirt");

        assert!(spec.matches(&json!({"name": "Red Shirt"})));
        assert!(spec.matches(&json!({"name": "shirt"})));
        assert!(!spec.matches(&json!({"name": "Pants"})));
    }

    #[test]
    fn test_contains_treats_needle_literally() {
        let spec = FilterSpec::new().contains("name", "a.c");

        assert!(spec.matches(&json!({"name": "a.c chair"})));
        assert!(!spec.matches(&json!({"name": "abc chair"})));
    }

    #[test]
    fn test_cmp_filter() {
        let spec = FilterSpec::new().cmp("price", CmpOp::Gt, 30.0);

        assert!(spec.matches(&json!({"price": 31})));
        assert!(!spec.matches(&json!({"price": 30})));
        assert!(!spec.matches(&json!({"price": 15})));
    }

    #[test]
    fn test_cmp_filters_merge_per_field() {
        let spec = FilterSpec::new()
            .cmp("price", CmpOp::Gt, 10.0)
            .cmp("price", CmpOp::Lt, 100.0);

        assert!(spec.matches(&json!({"price": 50})));
        assert!(!spec.matches(&json!({"price": 5})));
        assert!(!spec.matches(&json!({"price": 150})));

        let Some(Condition::Compare(ops)) = spec.get("price") else {
            panic!("expected comparison condition");
        };
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn test_nan_bound_matches_nothing() {
        let spec = FilterSpec::new().cmp("rating", CmpOp::Gt, f64::NAN);

        assert!(!spec.matches(&json!({"rating": 4.5})));
        assert!(!spec.matches(&json!({"rating": 0})));
    }

    #[test]
    fn test_conditions_combine_with_and() {
        let spec = FilterSpec::new()
            .eq("featured", json!(true))
            .cmp("rating", CmpOp::Gte, 4.0);

        assert!(spec.matches(&json!({"featured": true, "rating": 4.5})));
        assert!(!spec.matches(&json!({"featured": true, "rating": 3.0})));
        assert!(!spec.matches(&json!({"featured": false, "rating": 4.5})));
    }
}
