//! # Document Collection
//!
//! In-process document store with a chainable, awaitable query handle.
//! Sorting, projection, and pagination apply in that order after
//! filtering.

use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::api::filter::FilterSpec;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors. There is no retry or recovery here; failures
/// propagate to the caller unmodified.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A reader or writer panicked while holding the lock
    #[error("collection lock poisoned")]
    LockPoisoned,
}

/// A collection of JSON documents
#[derive(Debug, Clone, Default)]
pub struct Collection {
    documents: Arc<RwLock<Vec<Value>>>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, generating an `_id` if not present
    pub fn insert(&self, mut doc: Value) -> StoreResult<Value> {
        if doc.get("_id").is_none() {
            if let Some(obj) = doc.as_object_mut() {
                obj.insert(
                    "_id".to_string(),
                    Value::String(Uuid::new_v4().to_string()),
                );
            }
        }

        let mut docs = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        docs.push(doc.clone());
        Ok(doc)
    }

    /// Insert a batch of documents
    pub fn insert_many(
        &self,
        docs: impl IntoIterator<Item = Value>,
    ) -> StoreResult<usize> {
        let mut count = 0;
        for doc in docs {
            self.insert(doc)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start a query. Modifiers chain on the returned handle; nothing
    /// executes until `fetch` is awaited.
    pub fn find(&self, filter: FilterSpec) -> QueryHandle {
        QueryHandle {
            documents: Arc::clone(&self.documents),
            filter,
            sort: None,
            projection: None,
            skip: 0,
            limit: None,
        }
    }
}

/// A chainable, awaitable query over a collection
#[derive(Debug)]
pub struct QueryHandle {
    documents: Arc<RwLock<Vec<Value>>>,
    filter: FilterSpec,
    sort: Option<String>,
    projection: Option<String>,
    skip: usize,
    limit: Option<usize>,
}

impl QueryHandle {
    /// Set the sort spec: space-separated field tokens, a leading `-`
    /// means descending
    pub fn sort(mut self, spec: &str) -> Self {
        self.sort = Some(spec.to_string());
        self
    }

    /// Set the projection spec: space-separated field names to keep
    pub fn select(mut self, spec: &str) -> Self {
        self.projection = Some(spec.to_string());
        self
    }

    /// Skip the first `n` matches
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    /// Return at most `n` matches
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Execute the query, yielding the ordered, projected, paginated
    /// documents
    pub async fn fetch(self) -> StoreResult<Vec<Value>> {
        let mut matched = {
            let docs = self
                .documents
                .read()
                .map_err(|_| StoreError::LockPoisoned)?;
            docs.iter()
                .filter(|doc| self.filter.matches(doc))
                .cloned()
                .collect::<Vec<_>>()
        };

        if let Some(sort) = &self.sort {
            apply_sort(&mut matched, sort);
        }

        let matched = apply_pagination(matched, self.skip, self.limit);

        Ok(match &self.projection {
            Some(spec) => apply_projection(matched, spec),
            None => matched,
        })
    }
}

/// Sort records by the given spec. Insertion order is preserved among
/// ties (stable sort).
fn apply_sort(records: &mut [Value], spec: &str) {
    let keys: Vec<(&str, bool)> = spec
        .split_whitespace()
        .map(|token| match token.strip_prefix('-') {
            Some(field) => (field, false),
            None => (token, true),
        })
        .collect();

    if keys.is_empty() {
        return;
    }

    records.sort_by(|a, b| {
        for (field, ascending) in &keys {
            let cmp = compare_json_values(a.get(*field), b.get(*field));
            let cmp = if *ascending { cmp } else { cmp.reverse() };
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    });
}

/// Compare JSON values for sorting
fn compare_json_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .unwrap_or(0.0)
            .partial_cmp(&b.as_f64().unwrap_or(0.0))
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn apply_pagination(records: Vec<Value>, skip: usize, limit: Option<usize>) -> Vec<Value> {
    let iter = records.into_iter().skip(skip);
    match limit {
        Some(n) => iter.take(n).collect(),
        None => iter.collect(),
    }
}

/// Keep only the listed fields in each document
fn apply_projection(records: Vec<Value>, spec: &str) -> Vec<Value> {
    let fields: Vec<&str> = spec.split_whitespace().collect();
    if fields.is_empty() {
        return records;
    }

    records
        .into_iter()
        .map(|doc| {
            if let Value::Object(obj) = doc {
                let kept: serde_json::Map<String, Value> = obj
                    .into_iter()
                    .filter(|(k, _)| fields.contains(&k.as_str()))
                    .collect();
                Value::Object(kept)
            } else {
                doc
            }
        })
        .collect()
}
