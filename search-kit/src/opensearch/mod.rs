//! OpenSearch implementation of the search transport.
//!
//! This module provides a concrete implementation of `SearchTransport`
//! using the OpenSearch Rust client.

mod transport;

pub use transport::OpenSearchTransport;
