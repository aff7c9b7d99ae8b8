//! Response decoder.
//!
//! Normalizes the distinct shapes an engine response can take (bulk
//! acknowledgement, single-document fetch, multi-hit search) into one
//! flat sequence of [`RawHit`] records plus a [`ResponseEnvelope`] of
//! response-level metadata.

use serde_json::{Map, Value};
use tracing::debug;

use search_kit_shared::{RawHit, ResponseEnvelope};

/// Decode a raw engine response.
///
/// Classification order is a deliberate tie-break policy, first match
/// wins:
///
/// 1. a top-level `items` collection (bulk acknowledgement),
/// 2. a top-level `_id` (single-document fetch),
/// 3. a `hits.hits` collection (search),
/// 4. otherwise an empty sequence.
///
/// Envelope extraction is independent of which branch fired.
pub fn decode(response: &Value) -> (Vec<RawHit>, ResponseEnvelope) {
    let hits = decode_hits(response);
    let envelope = decode_envelope(response);

    debug!(
        hit_count = hits.len(),
        has_errors = envelope.has_errors,
        "Decoded engine response"
    );

    (hits, envelope)
}

fn decode_hits(response: &Value) -> Vec<RawHit> {
    if let Some(items) = response.get("items").and_then(Value::as_array) {
        return items.iter().map(decode_bulk_item).collect();
    }

    if let Some(id) = response.get("_id") {
        return vec![RawHit {
            id: value_to_id(id),
            score: response.get("_score").and_then(Value::as_f64),
            source: response.get("_source").and_then(as_map),
            error: None,
        }];
    }

    if let Some(hits) = response
        .pointer("/hits/hits")
        .and_then(Value::as_array)
    {
        return hits.iter().map(decode_search_hit).collect();
    }

    Vec::new()
}

/// Decode one bulk acknowledgement item.
///
/// Each item wraps its payload in an operation key (`index`, `create`,
/// `update`, `delete`); the payload carries the identifier and, for
/// failed items, an error object.
fn decode_bulk_item(item: &Value) -> RawHit {
    let body = item
        .as_object()
        .and_then(|obj| obj.values().find(|v| v.is_object()));

    RawHit {
        id: body.and_then(|b| b.get("_id")).and_then(value_to_id),
        score: None,
        source: None,
        error: body.and_then(|b| b.get("error")).and_then(as_map),
    }
}

fn decode_search_hit(hit: &Value) -> RawHit {
    RawHit {
        id: hit.get("_id").and_then(value_to_id),
        score: hit.get("_score").and_then(Value::as_f64),
        source: hit.get("_source").and_then(as_map),
        error: None,
    }
}

fn decode_envelope(response: &Value) -> ResponseEnvelope {
    let total = response.pointer("/hits/total");
    let hits_total = match total {
        // Modern engines report an object, older ones a bare number.
        Some(Value::Object(obj)) => obj.get("value").and_then(Value::as_i64),
        Some(other) => other.as_i64(),
        None => None,
    };

    ResponseEnvelope {
        took_ms: response.get("took").and_then(Value::as_i64),
        max_score: response
            .pointer("/hits/max_score")
            .and_then(Value::as_f64),
        hits_total,
        shards: response.get("_shards").and_then(as_map),
        aggregations: response
            .get("aggregations")
            .and_then(as_map)
            .unwrap_or_default(),
        has_errors: response
            .get("errors")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

fn as_map(value: &Value) -> Option<Map<String, Value>> {
    value.as_object().cloned()
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
