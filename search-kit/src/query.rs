//! Query builder collaborator.
//!
//! A thin builder that accumulates a search request body. Query-DSL
//! construction beyond this surface belongs to the caller; the kit only
//! needs a body it can hand to the transport.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{json, Map, Value};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Accumulates a search request body.
///
/// Every builder carries a unique instance token. `IndexHandle::find_with`
/// uses it to verify that a customizer returned the builder it was given
/// rather than a freshly constructed one.
#[derive(Debug)]
pub struct QueryBuilder {
    token: u64,
    body: Map<String, Value>,
}

impl QueryBuilder {
    /// Create an empty builder. An empty body searches all documents.
    pub fn new() -> Self {
        Self {
            token: NEXT_TOKEN.fetch_add(1, Ordering::Relaxed),
            body: Map::new(),
        }
    }

    /// Set the query clause.
    pub fn query(mut self, query: Value) -> Self {
        self.body.insert("query".to_string(), query);
        self
    }

    /// Set the starting offset.
    pub fn from(mut self, from: u64) -> Self {
        self.body.insert("from".to_string(), json!(from));
        self
    }

    /// Set the page size.
    pub fn size(mut self, size: u64) -> Self {
        self.body.insert("size".to_string(), json!(size));
        self
    }

    /// Append a sort clause.
    pub fn sort(mut self, sort: Value) -> Self {
        match self.body.get_mut("sort").and_then(Value::as_array_mut) {
            Some(sorts) => sorts.push(sort),
            None => {
                self.body.insert("sort".to_string(), json!([sort]));
            }
        }
        self
    }

    /// Add a named aggregation.
    pub fn aggregation(mut self, name: impl Into<String>, body: Value) -> Self {
        self.body
            .entry("aggs".to_string())
            .or_insert_with(|| json!({}))
            .as_object_mut()
            .expect("aggs is always an object")
            .insert(name.into(), body);
        self
    }

    /// Build the request body.
    pub fn build(&self) -> Value {
        Value::Object(self.body.clone())
    }

    pub(crate) fn token(&self) -> u64 {
        self.token
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body() {
        let builder = QueryBuilder::new();
        assert_eq!(builder.build(), json!({}));
    }

    #[test]
    fn test_body_accumulation() {
        let body = QueryBuilder::new()
            .query(json!({ "match": { "name": "hello" } }))
            .from(10)
            .size(25)
            .sort(json!({ "name.raw": "asc" }))
            .sort(json!("_score"))
            .build();

        assert_eq!(body["query"]["match"]["name"], json!("hello"));
        assert_eq!(body["from"], json!(10));
        assert_eq!(body["size"], json!(25));
        assert_eq!(
            body["sort"],
            json!([{ "name.raw": "asc" }, "_score"])
        );
    }

    #[test]
    fn test_aggregations() {
        let body = QueryBuilder::new()
            .aggregation("types", json!({ "terms": { "field": "type" } }))
            .aggregation("max_score", json!({ "max": { "field": "score" } }))
            .build();

        assert!(body["aggs"]["types"].is_object());
        assert!(body["aggs"]["max_score"].is_object());
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = QueryBuilder::new();
        let b = QueryBuilder::new();
        assert_ne!(a.token(), b.token());
    }
}
