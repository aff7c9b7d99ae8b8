//! # Search Kit Shared
//!
//! Shared data structures for the search kit crates: the document value
//! object handed to application code and the normalized records extracted
//! from raw engine responses.

pub mod document;
pub mod response;

pub use document::Document;
pub use response::{RawHit, ResponseEnvelope};
