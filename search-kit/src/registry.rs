//! Index registry.
//!
//! A keyed cache of index handles. Handle types are an explicit
//! registration table populated at startup; a handle is constructed at
//! most once per alias and a later `get` with diverging options is a
//! configuration conflict, never a silent overwrite.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::connection::{Connection, ConnectionManager};
use crate::errors::RegistryError;
use crate::index::{IndexDescriptor, IndexHandle};

/// The connection name used when a definition does not declare one.
pub const DEFAULT_CONNECTION_NAME: &str = "opensearch";

/// Custom constructor for handles that need more than the default wiring.
pub type HandleBuilder =
    Arc<dyn Fn(IndexDescriptor, Arc<Connection>) -> IndexHandle + Send + Sync>;

/// Construction options accepted by [`IndexRegistry::get`].
///
/// Non-empty options are recorded at first construction; later `get`
/// calls with different non-empty options fail with `ConfigConflict`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexOptions {
    /// Override the engine index name.
    pub index_name: Option<String>,
    /// Override the connection the handle talks through.
    pub connection_name: Option<String>,
    /// Override the index settings.
    pub settings: Map<String, Value>,
    /// Override the index mappings.
    pub mappings: Map<String, Value>,
}

impl IndexOptions {
    /// Whether no option is set.
    pub fn is_empty(&self) -> bool {
        self.index_name.is_none()
            && self.connection_name.is_none()
            && self.settings.is_empty()
            && self.mappings.is_empty()
    }
}

/// A registered index type: the defaults a handle is constructed from.
#[derive(Clone, Default)]
pub struct IndexDefinition {
    index_name: Option<String>,
    connection_name: Option<String>,
    settings: Map<String, Value>,
    mappings: Map<String, Value>,
    builder: Option<HandleBuilder>,
}

impl IndexDefinition {
    /// Create a definition with default wiring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine index name explicitly instead of deriving it from
    /// the alias.
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Declare the connection this index type talks through.
    pub fn connection_name(mut self, name: impl Into<String>) -> Self {
        self.connection_name = Some(name.into());
        self
    }

    /// Set the index settings.
    pub fn settings(mut self, settings: Map<String, Value>) -> Self {
        self.settings = settings;
        self
    }

    /// Set the index mappings.
    pub fn mappings(mut self, mappings: Map<String, Value>) -> Self {
        self.mappings = mappings;
        self
    }

    /// Install a custom handle constructor.
    pub fn build_with(mut self, builder: HandleBuilder) -> Self {
        self.builder = Some(builder);
        self
    }
}

impl std::fmt::Debug for IndexDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexDefinition")
            .field("index_name", &self.index_name)
            .field("connection_name", &self.connection_name)
            .field("custom_builder", &self.builder.is_some())
            .finish()
    }
}

/// Keyed cache of index handles.
///
/// An explicit instance owned by the host application. The alias→handle
/// map has no internal lock; a multi-threaded host wraps the registry
/// itself.
pub struct IndexRegistry {
    connections: ConnectionManager,
    definitions: HashMap<String, IndexDefinition>,
    instances: HashMap<String, Arc<IndexHandle>>,
    options: HashMap<String, IndexOptions>,
}

impl IndexRegistry {
    /// Create a registry resolving connections from the given manager.
    pub fn new(connections: ConnectionManager) -> Self {
        Self {
            connections,
            definitions: HashMap::new(),
            instances: HashMap::new(),
            options: HashMap::new(),
        }
    }

    /// The connection manager handles are wired from.
    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    /// Register an index type under an alias.
    pub fn register(&mut self, alias: impl Into<String>, definition: IndexDefinition) {
        self.definitions.insert(alias.into(), definition);
    }

    /// Get the handle for an alias, constructing it on first use.
    ///
    /// Returns the cached handle on later calls. Passing non-empty
    /// options that differ from the ones recorded at construction fails
    /// with `ConfigConflict`; identical or empty options are idempotent.
    pub fn get(
        &mut self,
        alias: &str,
        options: IndexOptions,
    ) -> Result<Arc<IndexHandle>, RegistryError> {
        if let Some(handle) = self.instances.get(alias) {
            if !options.is_empty() {
                if let Some(recorded) = self.options.get(alias) {
                    if recorded != &options {
                        return Err(RegistryError::config_conflict(alias));
                    }
                }
            }

            return Ok(Arc::clone(handle));
        }

        let handle = Arc::new(self.create_instance(alias, &options)?);

        self.options.insert(alias.to_string(), options);
        self.instances.insert(alias.to_string(), Arc::clone(&handle));

        debug!(alias = %alias, "Constructed index handle");
        Ok(handle)
    }

    /// Store a handle unconditionally, bypassing conflict checks.
    ///
    /// Intended for test doubles and manual wiring.
    pub fn set(&mut self, alias: impl Into<String>, handle: Arc<IndexHandle>) -> Arc<IndexHandle> {
        self.instances.insert(alias.into(), Arc::clone(&handle));
        handle
    }

    /// Whether a handle is cached under the alias.
    pub fn exists(&self, alias: &str) -> bool {
        self.instances.contains_key(alias)
    }

    /// Drop the cached handle and its recorded options.
    pub fn remove(&mut self, alias: &str) {
        self.instances.remove(alias);
        self.options.remove(alias);
    }

    /// Drop every cached handle and all recorded options.
    pub fn clear(&mut self) {
        self.instances.clear();
        self.options.clear();
    }

    fn create_instance(
        &self,
        alias: &str,
        options: &IndexOptions,
    ) -> Result<IndexHandle, RegistryError> {
        let definition = self
            .resolve_definition(alias)
            .ok_or_else(|| RegistryError::missing_index_type(alias))?;

        let short_alias = alias.rsplit('.').next().unwrap_or(alias);
        let index_name = options
            .index_name
            .clone()
            .or_else(|| definition.index_name.clone())
            .unwrap_or_else(|| underscore(short_alias));

        let connection_name = options
            .connection_name
            .clone()
            .or_else(|| definition.connection_name.clone())
            .unwrap_or_else(|| DEFAULT_CONNECTION_NAME.to_string());

        let connection = self
            .connections
            .get(&connection_name)
            .ok_or_else(|| RegistryError::connection_misconfigured(&connection_name))?;

        let settings = if options.settings.is_empty() {
            definition.settings.clone()
        } else {
            options.settings.clone()
        };
        let mappings = if options.mappings.is_empty() {
            definition.mappings.clone()
        } else {
            options.mappings.clone()
        };

        let descriptor = IndexDescriptor {
            alias: alias.to_string(),
            index_name,
            settings,
            mappings,
            connection_name,
        };

        Ok(match &definition.builder {
            Some(build) => build(descriptor, connection),
            None => IndexHandle::new(descriptor, connection),
        })
    }

    /// Resolve the definition for an alias.
    ///
    /// A dotted `plugin.alias` consults the full key first, then the
    /// bare alias after the dot.
    fn resolve_definition(&self, alias: &str) -> Option<&IndexDefinition> {
        if let Some(definition) = self.definitions.get(alias) {
            return Some(definition);
        }

        alias
            .split_once('.')
            .and_then(|(_, bare)| self.definitions.get(bare))
    }
}

impl std::fmt::Debug for IndexRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexRegistry")
            .field("definitions", &self.definitions.keys().collect::<Vec<_>>())
            .field("instances", &self.instances.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Deterministic naming transform from an alias to an engine index name.
fn underscore(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;

    for ch in name.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower = false;
        } else if ch == '-' || ch == ' ' {
            out.push('_');
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_ascii_alphanumeric();
        }
    }

    out
}
