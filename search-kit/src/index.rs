//! Index handles.
//!
//! An `IndexHandle` is the object callers use to talk to one configured
//! index: lifecycle management, single-document fetches, and query
//! execution. It owns its descriptor and shares a connection; query
//! execution is delegated to the transport, response decoding to the
//! result-set layer.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::connection::Connection;
use crate::errors::IndexError;
use crate::query::QueryBuilder;
use crate::resultset::ResultSet;
use search_kit_shared::Document;

/// Immutable identity and configuration of one logical index.
///
/// Frozen once the owning handle is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDescriptor {
    /// The logical name the index is registered under.
    pub alias: String,
    /// The engine index name. Derived from the alias when not set
    /// explicitly; an empty name fails at first use.
    pub index_name: String,
    /// Index settings applied on creation.
    pub settings: Map<String, Value>,
    /// Index mappings applied on creation and update.
    pub mappings: Map<String, Value>,
    /// The name of the connection this index talks through.
    pub connection_name: String,
}

/// A configured, connected index.
pub struct IndexHandle {
    descriptor: IndexDescriptor,
    connection: Arc<Connection>,
}

impl IndexHandle {
    /// Create a handle from a descriptor and a shared connection.
    pub fn new(descriptor: IndexDescriptor, connection: Arc<Connection>) -> Self {
        Self {
            descriptor,
            connection,
        }
    }

    /// The descriptor this handle was constructed from.
    pub fn descriptor(&self) -> &IndexDescriptor {
        &self.descriptor
    }

    /// The alias this handle is registered under.
    pub fn alias(&self) -> &str {
        &self.descriptor.alias
    }

    /// The configured index settings.
    pub fn settings(&self) -> &Map<String, Value> {
        &self.descriptor.settings
    }

    /// The configured index mappings.
    pub fn mappings(&self) -> &Map<String, Value> {
        &self.descriptor.mappings
    }

    /// The connection this handle talks through.
    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// The engine index name.
    ///
    /// Fails with `UnresolvableIndexName` when the configured derivation
    /// produced an empty string.
    pub fn index_name(&self) -> Result<&str, IndexError> {
        if self.descriptor.index_name.is_empty() {
            return Err(IndexError::unresolvable_index_name(&self.descriptor.alias));
        }

        Ok(&self.descriptor.index_name)
    }

    /// Wrap a raw engine response in a result set for this index.
    pub fn result_set(&self, response: Value) -> ResultSet {
        ResultSet::new(response, self.alias(), self.connection.documents())
    }

    /// Create the index with the configured settings and mappings.
    pub async fn create_index(&self) -> Result<bool, IndexError> {
        let index = self.index_name()?;
        let body = json!({
            "settings": self.descriptor.settings,
            "mappings": self.descriptor.mappings,
        });

        let acknowledged = self.connection.transport().create_index(index, body).await?;
        debug!(index = %index, acknowledged, "Created index");
        Ok(acknowledged)
    }

    /// Update the index mappings.
    pub async fn update_index(&self) -> Result<bool, IndexError> {
        let index = self.index_name()?;
        let mappings = Value::Object(self.descriptor.mappings.clone());

        let acknowledged = self
            .connection
            .transport()
            .update_index(index, mappings)
            .await?;
        debug!(index = %index, acknowledged, "Updated index mappings");
        Ok(acknowledged)
    }

    /// Delete the index.
    pub async fn delete_index(&self) -> Result<bool, IndexError> {
        let index = self.index_name()?;

        let acknowledged = self.connection.transport().delete_index(index).await?;
        debug!(index = %index, acknowledged, "Deleted index");
        Ok(acknowledged)
    }

    /// Check whether the index exists.
    pub async fn index_exists(&self) -> Result<bool, IndexError> {
        let index = self.index_name()?;
        self.connection.transport().index_exists(index).await
    }

    /// Fetch a single document by identifier.
    ///
    /// Returns `Ok(None)` when the document does not exist.
    pub async fn get(&self, document_id: &str) -> Result<Option<Document>, IndexError> {
        let index = self.index_name()?;

        let response = self.connection.transport().get(index, document_id).await?;
        Ok(response.and_then(|body| self.result_set(body).first()))
    }

    /// Execute a search over all documents.
    pub async fn find(&self) -> Result<ResultSet, IndexError> {
        self.find_with(|builder| builder).await
    }

    /// Execute a search customized through the query builder.
    ///
    /// The customizer receives a fresh builder from the connection's
    /// query builder collaborator and must return that same builder.
    /// Fails with `MissingQueryBuilder` when the collaborator is not
    /// configured and with `InvalidBuilderResult` when the customizer
    /// returns a different builder instance.
    pub async fn find_with<F>(&self, customizer: F) -> Result<ResultSet, IndexError>
    where
        F: FnOnce(QueryBuilder) -> QueryBuilder,
    {
        let builder = self
            .connection
            .query_builder()
            .ok_or(IndexError::MissingQueryBuilder)?;

        let token = builder.token();
        let builder = customizer(builder);
        if builder.token() != token {
            return Err(IndexError::InvalidBuilderResult);
        }

        let index = self.index_name()?;
        let response = self
            .connection
            .transport()
            .search(index, builder.build())
            .await?;

        Ok(self.result_set(response))
    }

    /// Execute a bulk request and decode the acknowledgement.
    ///
    /// `operations` is the flat action/source line sequence of the engine
    /// bulk protocol. Per-item failures surface on the materialized
    /// documents, not as an error.
    pub async fn bulk(&self, operations: Vec<Value>) -> Result<ResultSet, IndexError> {
        let index = self.index_name()?;

        let response = self.connection.transport().bulk(index, operations).await?;
        Ok(self.result_set(response))
    }
}

impl std::fmt::Debug for IndexHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexHandle")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::interfaces::SearchTransport;

    /// Mock transport recording every call for assertions.
    struct MockTransport {
        calls: Mutex<Vec<(String, String, Value)>>,
        search_response: Value,
        get_response: Option<Value>,
        bulk_response: Value,
        exists: bool,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                search_response: json!({
                    "took": 1,
                    "hits": {
                        "total": { "value": 1 },
                        "max_score": 1.0,
                        "hits": [
                            { "_id": "1", "_score": 1.0, "_source": { "name": "hello" } }
                        ]
                    }
                }),
                get_response: Some(json!({
                    "_id": "42",
                    "found": true,
                    "_source": { "title": "fetched" }
                })),
                bulk_response: json!({
                    "errors": false,
                    "items": [
                        { "index": { "_id": "1", "status": 201 } },
                        { "index": { "_id": "2", "status": 201 } }
                    ]
                }),
                exists: true,
            }
        }

        fn record(&self, op: &str, index: &str, body: Value) {
            self.calls
                .lock()
                .unwrap()
                .push((op.to_string(), index.to_string(), body));
        }

        fn calls(&self) -> Vec<(String, String, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchTransport for MockTransport {
        async fn search(&self, index: &str, body: Value) -> Result<Value, IndexError> {
            self.record("search", index, body);
            Ok(self.search_response.clone())
        }

        async fn get(&self, index: &str, id: &str) -> Result<Option<Value>, IndexError> {
            self.record("get", index, json!(id));
            Ok(self.get_response.clone())
        }

        async fn bulk(&self, index: &str, operations: Vec<Value>) -> Result<Value, IndexError> {
            self.record("bulk", index, json!(operations));
            Ok(self.bulk_response.clone())
        }

        async fn create_index(&self, index: &str, body: Value) -> Result<bool, IndexError> {
            self.record("create_index", index, body);
            Ok(true)
        }

        async fn update_index(&self, index: &str, mappings: Value) -> Result<bool, IndexError> {
            self.record("update_index", index, mappings);
            Ok(true)
        }

        async fn delete_index(&self, index: &str) -> Result<bool, IndexError> {
            self.record("delete_index", index, json!(null));
            Ok(true)
        }

        async fn index_exists(&self, index: &str) -> Result<bool, IndexError> {
            self.record("index_exists", index, json!(null));
            Ok(self.exists)
        }

        async fn health_check(&self) -> Result<bool, IndexError> {
            Ok(true)
        }
    }

    fn descriptor(index_name: &str) -> IndexDescriptor {
        IndexDescriptor {
            alias: "pages".to_string(),
            index_name: index_name.to_string(),
            settings: serde_json::from_value(json!({ "number_of_shards": 1 })).unwrap(),
            mappings: serde_json::from_value(
                json!({ "properties": { "name": { "type": "text" } } }),
            )
            .unwrap(),
            connection_name: "opensearch".to_string(),
        }
    }

    fn handle_with(transport: Arc<MockTransport>) -> IndexHandle {
        let connection = Connection::new("opensearch", transport);
        IndexHandle::new(descriptor("pages"), Arc::new(connection))
    }

    #[test]
    fn test_index_name() {
        let transport = Arc::new(MockTransport::new());
        let handle = handle_with(transport);

        assert_eq!(handle.index_name().unwrap(), "pages");
    }

    #[test]
    fn test_unresolvable_index_name() {
        let transport = Arc::new(MockTransport::new());
        let connection = Arc::new(Connection::new("opensearch", transport));
        let handle = IndexHandle::new(descriptor(""), connection);

        assert!(matches!(
            handle.index_name(),
            Err(IndexError::UnresolvableIndexName { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_index_sends_settings_and_mappings() {
        let transport = Arc::new(MockTransport::new());
        let handle = handle_with(Arc::clone(&transport));

        assert!(handle.create_index().await.unwrap());

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        let (op, index, body) = &calls[0];
        assert_eq!(op, "create_index");
        assert_eq!(index, "pages");
        assert_eq!(body["settings"]["number_of_shards"], json!(1));
        assert_eq!(
            body["mappings"]["properties"]["name"]["type"],
            json!("text")
        );
    }

    #[tokio::test]
    async fn test_update_index_sends_mappings() {
        let transport = Arc::new(MockTransport::new());
        let handle = handle_with(Arc::clone(&transport));

        assert!(handle.update_index().await.unwrap());

        let (op, index, body) = &transport.calls()[0];
        assert_eq!(op, "update_index");
        assert_eq!(index, "pages");
        assert_eq!(body["properties"]["name"]["type"], json!("text"));
    }

    #[tokio::test]
    async fn test_delete_and_exists() {
        let transport = Arc::new(MockTransport::new());
        let handle = handle_with(Arc::clone(&transport));

        assert!(handle.index_exists().await.unwrap());
        assert!(handle.delete_index().await.unwrap());

        let ops: Vec<String> = transport.calls().iter().map(|c| c.0.clone()).collect();
        assert_eq!(ops, vec!["index_exists", "delete_index"]);
    }

    #[tokio::test]
    async fn test_get_materializes_document() {
        let transport = Arc::new(MockTransport::new());
        let handle = handle_with(transport);

        let document = handle.get("42").await.unwrap().unwrap();

        assert_eq!(document.document_id(), Some("42"));
        assert_eq!(document.get("title"), Some(&json!("fetched")));
        assert!(!document.is_modified());
    }

    #[tokio::test]
    async fn test_get_missing_document() {
        let mut transport = MockTransport::new();
        transport.get_response = None;
        let handle = handle_with(Arc::new(transport));

        assert!(handle.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_executes_search() {
        let transport = Arc::new(MockTransport::new());
        let handle = handle_with(Arc::clone(&transport));

        let rs = handle.find().await.unwrap();

        assert_eq!(rs.len(), 1);
        assert_eq!(rs.hits_total(), Some(1));

        let (op, index, body) = &transport.calls()[0];
        assert_eq!(op, "search");
        assert_eq!(index, "pages");
        assert_eq!(body, &json!({}));
    }

    #[tokio::test]
    async fn test_find_with_customizer_builds_body() {
        let transport = Arc::new(MockTransport::new());
        let handle = handle_with(Arc::clone(&transport));

        handle
            .find_with(|builder| {
                builder
                    .query(json!({ "match": { "name": "hello" } }))
                    .size(10)
            })
            .await
            .unwrap();

        let (_, _, body) = &transport.calls()[0];
        assert_eq!(body["query"]["match"]["name"], json!("hello"));
        assert_eq!(body["size"], json!(10));
    }

    #[tokio::test]
    async fn test_find_without_query_builder() {
        let transport = Arc::new(MockTransport::new());
        let connection = Connection::new("opensearch", transport).without_query_builders();
        let handle = IndexHandle::new(descriptor("pages"), Arc::new(connection));

        assert!(matches!(
            handle.find().await,
            Err(IndexError::MissingQueryBuilder)
        ));
    }

    #[tokio::test]
    async fn test_find_with_foreign_builder() {
        let transport = Arc::new(MockTransport::new());
        let handle = handle_with(Arc::clone(&transport));

        let result = handle.find_with(|_builder| QueryBuilder::new()).await;

        assert!(matches!(result, Err(IndexError::InvalidBuilderResult)));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_decodes_acknowledgement() {
        let transport = Arc::new(MockTransport::new());
        let handle = handle_with(Arc::clone(&transport));

        let operations = vec![
            json!({ "index": { "_id": "1" } }),
            json!({ "name": "first" }),
            json!({ "index": { "_id": "2" } }),
            json!({ "name": "second" }),
        ];
        let rs = handle.bulk(operations).await.unwrap();

        assert_eq!(rs.len(), 2);
        let ids: Vec<String> = rs
            .documents()
            .map(|d| d.document_id().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
