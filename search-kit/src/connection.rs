//! Connections and the connection manager.
//!
//! A `Connection` bundles a named engine transport with the collaborators
//! index handles need when decoding responses: the document type registry
//! and the optional query builder factory.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::documents::DocumentTypeRegistry;
use crate::interfaces::SearchTransport;
use crate::query::QueryBuilder;

/// Factory producing fresh query builders for `find` calls.
pub type QueryBuilderFactory = Arc<dyn Fn() -> QueryBuilder + Send + Sync>;

/// A named engine connection.
pub struct Connection {
    name: String,
    transport: Arc<dyn SearchTransport>,
    documents: Arc<DocumentTypeRegistry>,
    query_builders: Option<QueryBuilderFactory>,
}

impl Connection {
    /// Create a connection with a default document registry and the
    /// standard query builder factory.
    pub fn new(name: impl Into<String>, transport: Arc<dyn SearchTransport>) -> Self {
        Self {
            name: name.into(),
            transport,
            documents: Arc::new(DocumentTypeRegistry::new()),
            query_builders: Some(Arc::new(QueryBuilder::new)),
        }
    }

    /// Replace the document type registry.
    pub fn with_documents(mut self, documents: DocumentTypeRegistry) -> Self {
        self.documents = Arc::new(documents);
        self
    }

    /// Replace the query builder factory.
    pub fn with_query_builders(mut self, factory: QueryBuilderFactory) -> Self {
        self.query_builders = Some(factory);
        self
    }

    /// Drop the query builder collaborator.
    ///
    /// `find` calls on handles of this connection fail with
    /// `MissingQueryBuilder`.
    pub fn without_query_builders(mut self) -> Self {
        self.query_builders = None;
        self
    }

    /// The configured connection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The engine transport.
    pub fn transport(&self) -> &Arc<dyn SearchTransport> {
        &self.transport
    }

    /// The document type registry for this connection.
    pub fn documents(&self) -> &DocumentTypeRegistry {
        &self.documents
    }

    /// Produce a fresh query builder, if the collaborator is configured.
    pub fn query_builder(&self) -> Option<QueryBuilder> {
        self.query_builders.as_ref().map(|factory| factory())
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.name)
            .field("documents", &self.documents)
            .field("query_builders", &self.query_builders.is_some())
            .finish()
    }
}

/// Keyed store of named connections.
///
/// Index handles obtain their connection by name at construction time.
/// The manager is an explicit instance owned by the host application,
/// not process-global state.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    connections: HashMap<String, Arc<Connection>>,
}

impl ConnectionManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection under its configured name.
    pub fn add(&mut self, connection: Connection) -> Arc<Connection> {
        let name = connection.name().to_string();
        let connection = Arc::new(connection);

        info!(connection = %name, "Registered connection");
        self.connections.insert(name, Arc::clone(&connection));
        connection
    }

    /// Look up a connection by name.
    pub fn get(&self, name: &str) -> Option<Arc<Connection>> {
        self.connections.get(name).map(Arc::clone)
    }

    /// Whether a connection is registered under the given name.
    pub fn exists(&self, name: &str) -> bool {
        self.connections.contains_key(name)
    }
}
