//! Interface definitions for the engine transport.
//!
//! This module defines the abstract `SearchTransport` trait that allows
//! for dependency injection and swappable engine backends.

mod search_transport;

pub use search_transport::SearchTransport;
