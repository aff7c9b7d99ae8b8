//! Configuration and dependency wiring for the command.

mod catalog;
mod dependencies;

pub use catalog::{IndexCatalog, IndexCatalogEntry};
pub use dependencies::Dependencies;
