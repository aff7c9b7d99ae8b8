//! Normalized response records.
//!
//! Every response shape the engine can return (search, single-document
//! fetch, bulk acknowledgement) is decoded into a flat sequence of
//! `RawHit` records plus one `ResponseEnvelope` of response-level
//! metadata.

use serde::Serialize;
use serde_json::{Map, Value};

/// The normalized per-document record extracted from any response shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawHit {
    /// The document identifier, when the response carries one.
    pub id: Option<String>,
    /// The relevance score. Only search hits carry scores.
    pub score: Option<f64>,
    /// The document source body. Absent for bulk acknowledgement items.
    pub source: Option<Map<String, Value>>,
    /// The per-item error object reported by a bulk operation.
    pub error: Option<Map<String, Value>>,
}

/// Response-level metadata, distinct from per-document data.
///
/// Every field is read defensively from the raw response: absent fields
/// decode to `None` (or an empty map for aggregations) rather than
/// failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    /// Milliseconds the engine spent on the request.
    pub took_ms: Option<i64>,
    /// The highest relevance score across the returned hits.
    pub max_score: Option<f64>,
    /// The declared total number of matching documents, which may exceed
    /// the number of hits present on the page.
    pub hits_total: Option<i64>,
    /// Shard accounting reported by the engine.
    pub shards: Option<Map<String, Value>>,
    /// Aggregation results keyed by aggregation name.
    pub aggregations: Map<String, Value>,
    /// Top-level error flag echoed from the response.
    pub has_errors: bool,
}
