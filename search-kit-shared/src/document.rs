//! Document value object.
//!
//! A `Document` is the unit handed to application code after a response
//! has been decoded. Response metadata (`id`, `score`) lives in reserved
//! slots so it can never collide with a source field that happens to be
//! named `id` or `score`.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

/// Response metadata kept apart from ordinary fields.
#[derive(Debug, Clone, Default, PartialEq)]
struct Reserved {
    document_id: Option<String>,
    score: Option<f64>,
}

/// A materialized document.
///
/// Documents are built from decoded hits and start out clean: fields read
/// back from the engine are already persisted, so nothing is marked
/// modified until the caller mutates the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    reserved: Reserved,
    fields: Map<String, Value>,
    dirty: BTreeSet<String>,
    errors: Vec<Map<String, Value>>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from a source body.
    ///
    /// Fields are assigned raw, bypassing `set`, and the document is
    /// marked clean immediately: the data represents state already
    /// persisted by the engine.
    pub fn from_source(source: Map<String, Value>) -> Self {
        Self {
            reserved: Reserved::default(),
            fields: source,
            dirty: BTreeSet::new(),
            errors: Vec::new(),
        }
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Set a field value, marking the field as modified.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        self.dirty.insert(field.clone());
        self.fields.insert(field, value);
    }

    /// Remove a field.
    pub fn unset(&mut self, field: &str) {
        self.fields.remove(field);
        self.dirty.remove(field);
    }

    /// Check whether a field is present.
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// All fields, in the order they appeared in the engine response.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The document identifier reported by the engine.
    pub fn document_id(&self) -> Option<&str> {
        self.reserved.document_id.as_deref()
    }

    /// Set the document identifier.
    ///
    /// This is response metadata, not document content; it never touches
    /// the field map or the modified state.
    pub fn set_document_id(&mut self, id: Option<String>) {
        self.reserved.document_id = id;
    }

    /// The relevance score reported by the engine.
    pub fn score(&self) -> Option<f64> {
        self.reserved.score
    }

    /// Set the relevance score.
    pub fn set_score(&mut self, score: Option<f64>) {
        self.reserved.score = score;
    }

    /// Engine-reported errors attached to this document.
    ///
    /// A failed bulk item surfaces here instead of aborting the decode of
    /// the whole batch.
    pub fn errors(&self) -> &[Map<String, Value>] {
        &self.errors
    }

    /// Attach engine-reported errors.
    pub fn set_errors(&mut self, errors: Vec<Map<String, Value>>) {
        self.errors = errors;
    }

    /// Whether any engine-reported errors are attached.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether any field has been modified since construction or the last
    /// `mark_clean`.
    pub fn is_modified(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Whether a specific field has been modified.
    pub fn is_field_modified(&self, field: &str) -> bool {
        self.dirty.contains(field)
    }

    /// Names of the modified fields.
    pub fn modified_fields(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    /// Reset the modified state without touching field values.
    pub fn mark_clean(&mut self) {
        self.dirty.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_from_source_is_clean() {
        let doc = Document::from_source(source(&[("name", json!("hello"))]));

        assert_eq!(doc.get("name"), Some(&json!("hello")));
        assert!(!doc.is_modified());
        assert!(!doc.has_errors());
    }

    #[test]
    fn test_set_marks_modified() {
        let mut doc = Document::from_source(source(&[("name", json!("hello"))]));
        doc.set("name", json!("world"));

        assert!(doc.is_modified());
        assert!(doc.is_field_modified("name"));
        assert_eq!(doc.modified_fields().collect::<Vec<_>>(), vec!["name"]);

        doc.mark_clean();
        assert!(!doc.is_modified());
        assert_eq!(doc.get("name"), Some(&json!("world")));
    }

    #[test]
    fn test_reserved_slots_do_not_collide_with_fields() {
        let mut doc = Document::from_source(source(&[
            ("id", json!("field-id")),
            ("score", json!(42)),
        ]));
        doc.set_document_id(Some("meta-id".to_string()));
        doc.set_score(Some(1.5));

        // Metadata and fields stay independent.
        assert_eq!(doc.document_id(), Some("meta-id"));
        assert_eq!(doc.score(), Some(1.5));
        assert_eq!(doc.get("id"), Some(&json!("field-id")));
        assert_eq!(doc.get("score"), Some(&json!(42)));
    }

    #[test]
    fn test_metadata_does_not_mark_modified() {
        let mut doc = Document::new();
        doc.set_document_id(Some("1".to_string()));
        doc.set_score(Some(1.0));
        doc.set_errors(vec![source(&[("type", json!("boom"))])]);

        assert!(!doc.is_modified());
        assert!(doc.has_errors());
    }

    #[test]
    fn test_field_order_preserved() {
        let doc = Document::from_source(source(&[
            ("zeta", json!(1)),
            ("alpha", json!(2)),
            ("mu", json!(3)),
        ]));

        let keys: Vec<&str> = doc.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn test_unset() {
        let mut doc = Document::new();
        doc.set("name", json!("hello"));
        assert!(doc.has("name"));

        doc.unset("name");
        assert!(!doc.has("name"));
        assert!(!doc.is_field_modified("name"));
    }
}
