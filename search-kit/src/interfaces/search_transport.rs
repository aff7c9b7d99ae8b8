//! Search transport trait definition.
//!
//! This module defines the abstract interface for engine requests,
//! allowing for different backend implementations (OpenSearch, mocks).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::IndexError;

/// Abstract capability interface for engine requests.
///
/// This trait exposes exactly the operations the kit needs; there is no
/// implicit forwarding of arbitrary engine calls. Anything beyond this
/// surface is obtained from the connection collaborator by the caller.
///
/// Implementations return raw response bodies as `serde_json::Value`;
/// decoding into documents is owned by the result-set layer. Network
/// policy (retry, backoff, timeouts) is owned by implementations, never
/// by callers of this trait.
///
/// All implementations must be `Send + Sync` to allow use across async
/// tasks.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Execute a search request against an index.
    async fn search(&self, index: &str, body: Value) -> Result<Value, IndexError>;

    /// Fetch a single document by identifier.
    ///
    /// Returns `Ok(None)` when the document does not exist.
    async fn get(&self, index: &str, id: &str) -> Result<Option<Value>, IndexError>;

    /// Execute a bulk request against an index.
    ///
    /// `operations` is the flat action/source line sequence of the engine
    /// bulk protocol. The returned acknowledgement body reports per-item
    /// outcomes.
    async fn bulk(&self, index: &str, operations: Vec<Value>) -> Result<Value, IndexError>;

    /// Create an index with the given settings and mappings body.
    ///
    /// Returns whether the engine acknowledged the creation.
    async fn create_index(&self, index: &str, body: Value) -> Result<bool, IndexError>;

    /// Update the mappings of an existing index.
    async fn update_index(&self, index: &str, mappings: Value) -> Result<bool, IndexError>;

    /// Delete an index.
    async fn delete_index(&self, index: &str) -> Result<bool, IndexError>;

    /// Check whether an index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, IndexError>;

    /// Check whether the engine is healthy and reachable.
    async fn health_check(&self) -> Result<bool, IndexError>;
}
