//! Result sets.
//!
//! A [`ResultSet`] wraps one raw engine response. Decoding happens exactly
//! once at construction; iteration materializes documents lazily from the
//! in-memory hit list, so restarting iteration replays the same hits and
//! never re-queries the engine.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::decoder;
use crate::documents::{DocumentFactory, DocumentTypeRegistry};
use search_kit_shared::{Document, RawHit, ResponseEnvelope};

/// A decoded engine response exposing envelope metadata and a lazy
/// sequence of materialized documents.
pub struct ResultSet {
    raw: Value,
    hits: Vec<RawHit>,
    envelope: ResponseEnvelope,
    factory: Arc<dyn DocumentFactory>,
}

impl ResultSet {
    /// Decode a raw response for the given index alias.
    ///
    /// The document factory is resolved once here and reused for every
    /// document this result set materializes.
    pub fn new(raw: Value, alias: &str, documents: &DocumentTypeRegistry) -> Self {
        let (hits, envelope) = decoder::decode(&raw);
        let factory = documents.resolve(alias);

        Self {
            raw,
            hits,
            envelope,
            factory,
        }
    }

    /// Override the document factory for this result set.
    ///
    /// Must be called before iteration to affect every document.
    pub fn set_factory(&mut self, factory: Arc<dyn DocumentFactory>) {
        self.factory = factory;
    }

    /// Number of decoded hits.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Whether the response decoded to zero hits.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// The decoded hits, in engine response order.
    pub fn hits(&self) -> &[RawHit] {
        &self.hits
    }

    /// Iterate over materialized documents in decoded hit order.
    pub fn documents(&self) -> Documents<'_> {
        Documents {
            result_set: self,
            position: 0,
        }
    }

    /// Materialize the first document, if any.
    pub fn first(&self) -> Option<Document> {
        self.documents().next()
    }

    /// Milliseconds the engine spent on the request.
    pub fn took_ms(&self) -> Option<i64> {
        self.envelope.took_ms
    }

    /// The highest relevance score across the returned hits.
    pub fn max_score(&self) -> Option<f64> {
        self.envelope.max_score
    }

    /// The declared total number of matching documents.
    pub fn hits_total(&self) -> Option<i64> {
        self.envelope.hits_total
    }

    /// Shard accounting reported by the engine.
    pub fn shards(&self) -> Option<&Map<String, Value>> {
        self.envelope.shards.as_ref()
    }

    /// Aggregation results keyed by aggregation name.
    pub fn aggregations(&self) -> &Map<String, Value> {
        &self.envelope.aggregations
    }

    /// Top-level error flag echoed from the response.
    pub fn has_errors(&self) -> bool {
        self.envelope.has_errors
    }

    /// The response envelope.
    pub fn envelope(&self) -> &ResponseEnvelope {
        &self.envelope
    }

    /// The original raw response.
    pub fn response(&self) -> &Value {
        &self.raw
    }
}

impl std::fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultSet")
            .field("hits", &self.hits.len())
            .field("envelope", &self.envelope)
            .finish()
    }
}

/// Iterator over the documents of a [`ResultSet`].
///
/// Documents are materialized one at a time; dropping the iterator and
/// calling [`ResultSet::documents`] again replays the same hit list.
pub struct Documents<'a> {
    result_set: &'a ResultSet,
    position: usize,
}

impl Iterator for Documents<'_> {
    type Item = Document;

    fn next(&mut self) -> Option<Document> {
        let hit = self.result_set.hits.get(self.position)?;
        self.position += 1;
        Some(self.result_set.factory.build(hit))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.result_set.hits.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Documents<'_> {}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = Document;
    type IntoIter = Documents<'a>;

    fn into_iter(self) -> Documents<'a> {
        self.documents()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> DocumentTypeRegistry {
        DocumentTypeRegistry::new()
    }

    fn search_response() -> Value {
        json!({
            "took": 12,
            "hits": {
                "total": { "value": 5, "relation": "eq" },
                "max_score": 3.0,
                "hits": [
                    { "_id": "a", "_score": 3.0, "_source": { "name": "first" } },
                    { "_id": "b", "_score": 2.0, "_source": { "name": "second" } },
                    { "_id": "c", "_score": 1.0, "_source": { "name": "third" } }
                ]
            }
        })
    }

    #[test]
    fn test_document_order_matches_hit_order() {
        let rs = ResultSet::new(search_response(), "pages", &registry());

        let names: Vec<Value> = rs
            .documents()
            .map(|d| d.get("name").cloned().unwrap())
            .collect();

        assert_eq!(names, vec![json!("first"), json!("second"), json!("third")]);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let rs = ResultSet::new(search_response(), "pages", &registry());

        let first_pass: Vec<Document> = rs.documents().collect();
        let second_pass: Vec<Document> = rs.documents().collect();

        assert_eq!(first_pass, second_pass);
        assert_eq!(first_pass.len(), 3);
    }

    #[test]
    fn test_hits_total_exceeds_page() {
        let rs = ResultSet::new(search_response(), "pages", &registry());

        assert_eq!(rs.len(), 3);
        assert_eq!(rs.hits_total(), Some(5));
    }

    #[test]
    fn test_envelope_accessors() {
        let rs = ResultSet::new(search_response(), "pages", &registry());

        assert_eq!(rs.took_ms(), Some(12));
        assert_eq!(rs.max_score(), Some(3.0));
        assert!(rs.shards().is_none());
        assert!(rs.aggregations().is_empty());
        assert!(!rs.has_errors());
    }

    #[test]
    fn test_single_document_response_produces_one_document() {
        let response = json!({
            "_id": "42",
            "found": true,
            "_source": { "title": "hello" }
        });

        let rs = ResultSet::new(response, "pages", &registry());

        assert_eq!(rs.len(), 1);
        let document = rs.first().unwrap();
        assert_eq!(document.document_id(), Some("42"));
        assert_eq!(document.get("title"), Some(&json!("hello")));
    }

    #[test]
    fn test_bulk_response_with_item_error() {
        let response = json!({
            "errors": true,
            "items": [
                {
                    "index": {
                        "_id": "1",
                        "status": 400,
                        "error": {
                            "type": "document_parsing_exception",
                            "reason": "failed to parse"
                        }
                    }
                },
                { "index": { "_id": "2", "status": 201 } }
            ]
        });

        let rs = ResultSet::new(response, "pages", &registry());

        assert!(rs.has_errors());
        assert_eq!(rs.len(), 2);

        let first = rs.first().unwrap();
        assert_eq!(
            first.errors()[0]["type"],
            json!("document_parsing_exception")
        );

        // The failed item does not poison the rest of the batch.
        let second = rs.documents().nth(1).unwrap();
        assert!(!second.has_errors());
        assert_eq!(second.document_id(), Some("2"));
    }

    #[test]
    fn test_bulk_document_count_matches_items() {
        let response = json!({
            "errors": false,
            "items": [
                { "index": { "_id": "1" } },
                { "index": { "_id": "2" } },
                { "index": { "_id": "3" } },
                { "index": { "_id": "4" } }
            ]
        });

        let rs = ResultSet::new(response, "pages", &registry());

        let ids: Vec<String> = rs
            .documents()
            .map(|d| d.document_id().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_factory_override() {
        struct Marked;

        impl DocumentFactory for Marked {
            fn build(&self, hit: &RawHit) -> Document {
                let mut document =
                    crate::documents::GenericDocumentFactory.build(hit);
                document.set("marked", json!(true));
                document.mark_clean();
                document
            }
        }

        let mut rs = ResultSet::new(search_response(), "pages", &registry());
        rs.set_factory(Arc::new(Marked));

        assert!(rs
            .documents()
            .all(|d| d.get("marked") == Some(&json!(true))));
    }

    #[test]
    fn test_empty_response() {
        let rs = ResultSet::new(json!({ "acknowledged": true }), "pages", &registry());

        assert!(rs.is_empty());
        assert!(rs.first().is_none());
        assert_eq!(rs.documents().count(), 0);
    }
}
