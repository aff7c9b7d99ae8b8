//! Index handle error types.
//!
//! This module defines the error types that can occur while an index
//! handle talks to the engine or prepares a query.

use thiserror::Error;

/// Errors that can occur during index handle operations.
///
/// Nothing here is retried internally; every variant is a local
/// precondition or transport failure propagated to the caller.
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    /// The handle cannot derive an engine index name.
    #[error("Cannot resolve an index name for `{alias}`; set `index_name` explicitly")]
    UnresolvableIndexName {
        /// The alias the handle was registered under.
        alias: String,
    },

    /// The connection carries no query builder collaborator.
    #[error("No query builder is configured for this connection")]
    MissingQueryBuilder,

    /// A query customizer returned a builder other than the one it was given.
    #[error("The query customizer must return the builder instance it was given")]
    InvalidBuilderResult,

    /// The transport failed to reach the engine.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The engine answered with a non-success status.
    #[error("Response error: {0}")]
    ResponseError(String),

    /// The response body could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl IndexError {
    /// Create an unresolvable index name error.
    pub fn unresolvable_index_name(alias: impl Into<String>) -> Self {
        Self::UnresolvableIndexName {
            alias: alias.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    /// Create a response error.
    pub fn response(msg: impl Into<String>) -> Self {
        Self::ResponseError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
