//! # Query Parameter Parser
//!
//! Parses the product listing query parameters into a typed structure
//! and assembles the query plan.

use std::collections::HashMap;

use serde_json::json;

use super::filter::{CmpOp, FilterSpec};

/// Default page if not specified (or not a positive integer)
pub const DEFAULT_PAGE: usize = 1;

/// Default page size if not specified (or not a positive integer).
/// No maximum is enforced; callers may request arbitrarily large pages.
pub const DEFAULT_LIMIT: usize = 10;

/// Default sort when the `sort` parameter is absent
pub const DEFAULT_SORT: &str = "createdAt";

/// Fields that accept numeric comparison filters
pub const NUMERIC_FIELDS: [&str; 2] = ["price", "rating"];

/// A lexed numeric filter expression: `<field><op><value>`
#[derive(Debug, Clone, PartialEq)]
pub struct NumericFilter {
    pub field: String,
    pub op: CmpOp,
    pub value: f64,
}

/// Typed view of the recognized query parameters.
///
/// Recognized keys: `featured`, `company`, `name`, `sort`, `fields`,
/// `numericFilters`, `page`, `limit` (case-sensitive). Everything else
/// is ignored, and absent parameters leave the query unconstrained.
#[derive(Debug, Clone)]
pub struct ProductQuery {
    /// `featured` coerced to bool: exactly `"true"` is true, any other
    /// string is false
    pub featured: Option<bool>,

    /// `company` taken verbatim as an equality filter. The value is
    /// trusted as-is; sanitization is the caller's concern.
    pub company: Option<String>,

    /// `name` matched as a case-insensitive substring
    pub name: Option<String>,

    /// Sort field tokens in order; a leading `-` means descending
    pub sort: Option<Vec<String>>,

    /// Fields to project; `None` returns all fields
    pub fields: Option<Vec<String>>,

    /// Lexed numeric filter expressions, allow-list not yet applied
    pub numeric_filters: Vec<NumericFilter>,

    /// 1-based page number
    pub page: usize,

    /// Page size
    pub limit: usize,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            featured: None,
            company: None,
            name: None,
            sort: None,
            fields: None,
            numeric_filters: Vec::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ProductQuery {
    /// Parse query parameters from a raw key/value map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            featured: params.get("featured").map(|v| v == "true"),
            company: params.get("company").cloned(),
            name: params.get("name").cloned(),
            sort: params.get("sort").map(|v| split_list(v)).filter(|v| !v.is_empty()),
            fields: params.get("fields").map(|v| split_list(v)).filter(|v| !v.is_empty()),
            numeric_filters: params
                .get("numericFilters")
                .map(|v| lex_numeric_filters(v))
                .unwrap_or_default(),
            page: parse_positive(params.get("page"), DEFAULT_PAGE),
            limit: parse_positive(params.get("limit"), DEFAULT_LIMIT),
        }
    }

    /// Assemble the query plan: filter spec, sort spec, projection, and
    /// pagination window
    pub fn plan(&self) -> QueryPlan {
        let mut filter = FilterSpec::new();

        if let Some(featured) = self.featured {
            filter = filter.eq("featured", json!(featured));
        }
        if let Some(company) = &self.company {
            filter = filter.eq("company", json!(company));
        }
        if let Some(name) = &self.name {
            filter = filter.contains("name", name);
        }
        for nf in &self.numeric_filters {
            // Comparison filters are allow-listed; other fields drop silently
            if NUMERIC_FIELDS.contains(&nf.field.as_str()) {
                filter = filter.cmp(nf.field.clone(), nf.op, nf.value);
            }
        }

        QueryPlan {
            filter,
            sort: match &self.sort {
                Some(tokens) => tokens.join(" "),
                None => DEFAULT_SORT.to_string(),
            },
            projection: self.fields.as_ref().map(|f| f.join(" ")),
            // page is always >= 1; saturate so huge page/limit values
            // (no upper bound is enforced) cannot overflow
            skip: (self.page - 1).saturating_mul(self.limit),
            limit: self.limit,
        }
    }
}

/// The fully assembled filter/sort/projection/pagination specification,
/// ready for execution against a collection
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub filter: FilterSpec,

    /// Space-separated sort tokens, `-` prefix = descending
    pub sort: String,

    /// Space-separated projection field names, `None` = all fields
    pub projection: Option<String>,

    pub skip: usize,
    pub limit: usize,
}

/// Split a comma-separated parameter into trimmed, non-empty tokens
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a positive integer parameter, falling back to the default on
/// anything missing, non-numeric, or zero
fn parse_positive(value: Option<&String>, default: usize) -> usize {
    value
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

/// Lex a `numericFilters` string into `(field, op, value)` triples.
///
/// Expressions are comma-separated; within each, the first operator
/// occurrence splits field from value. Longest operators are tried
/// first so `>=` is never read as `>`. Expressions with no operator or
/// an empty field are dropped. Non-numeric values coerce to NaN and
/// flow through; NaN comparisons match nothing.
fn lex_numeric_filters(raw: &str) -> Vec<NumericFilter> {
    raw.split(',').filter_map(lex_expression).collect()
}

const OPERATORS: [(&str, CmpOp); 5] = [
    (">=", CmpOp::Gte),
    ("<=", CmpOp::Lte),
    (">", CmpOp::Gt),
    ("<", CmpOp::Lt),
    ("=", CmpOp::Eq),
];

fn lex_expression(expr: &str) -> Option<NumericFilter> {
    for (token, op) in OPERATORS {
        if let Some(idx) = expr.find(token) {
            let field = &expr[..idx];
            let value = &expr[idx + token.len()..];
            if field.is_empty() {
                return None;
            }
            return Some(NumericFilter {
                field: field.to_string(),
                op,
                value: value.parse::<f64>().unwrap_or(f64::NAN),
            });
        }
    }
    None
}
