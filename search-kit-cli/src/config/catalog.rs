//! Index catalog file format.
//!
//! The command registers index types from a JSON catalog so the registry
//! can resolve the alias given on the command line.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use search_kit::IndexDefinition;

/// The catalog of index definitions available to the command.
///
/// ```json
/// {
///     "indexes": {
///         "pages": {
///             "settings": { "number_of_shards": 1 },
///             "mappings": { "properties": { "title": { "type": "text" } } }
///         }
///     }
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct IndexCatalog {
    /// Index definitions keyed by alias.
    #[serde(default)]
    pub indexes: HashMap<String, IndexCatalogEntry>,
}

/// One index definition from the catalog.
#[derive(Debug, Default, Deserialize)]
pub struct IndexCatalogEntry {
    /// Explicit engine index name; derived from the alias when absent.
    #[serde(default)]
    pub index_name: Option<String>,
    /// Connection to talk through; the default connection when absent.
    #[serde(default)]
    pub connection: Option<String>,
    /// Index settings applied on creation.
    #[serde(default)]
    pub settings: Map<String, Value>,
    /// Index mappings applied on creation and update.
    #[serde(default)]
    pub mappings: Map<String, Value>,
}

impl IndexCatalog {
    /// Load a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, crate::CliError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl From<IndexCatalogEntry> for IndexDefinition {
    fn from(entry: IndexCatalogEntry) -> Self {
        let mut definition = IndexDefinition::new()
            .settings(entry.settings)
            .mappings(entry.mappings);

        if let Some(index_name) = entry.index_name {
            definition = definition.index_name(index_name);
        }
        if let Some(connection) = entry.connection {
            definition = definition.connection_name(connection);
        }

        definition
    }
}
