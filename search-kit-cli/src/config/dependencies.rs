//! Dependency initialization and wiring for the command.

use std::env;
use std::sync::Arc;

use tracing::info;

use crate::config::IndexCatalog;
use crate::CliError;
use search_kit::{
    Connection, ConnectionManager, IndexRegistry, OpenSearchTransport, SearchTransport,
    DEFAULT_CONNECTION_NAME,
};

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default index catalog path.
const DEFAULT_CATALOG_PATH: &str = "indexes.json";

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured registry ready to resolve index handles.
    pub registry: IndexRegistry,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `SEARCH_KIT_INDEXES`: index catalog path (default: indexes.json)
    pub async fn new() -> Result<Self, CliError> {
        let opensearch_url =
            env::var("OPENSEARCH_URL").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string());
        let catalog_path =
            env::var("SEARCH_KIT_INDEXES").unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string());

        info!(
            opensearch_url = %opensearch_url,
            catalog_path = %catalog_path,
            "Initializing dependencies"
        );

        let transport = OpenSearchTransport::new(&opensearch_url)
            .map_err(|e| CliError::config(format!("Failed to create transport: {}", e)))?;
        let transport: Arc<dyn SearchTransport> = Arc::new(transport);

        let healthy = transport
            .health_check()
            .await
            .map_err(|e| CliError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(CliError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        let catalog = IndexCatalog::load(&catalog_path)?;

        let mut connections = ConnectionManager::new();
        connections.add(Connection::new(DEFAULT_CONNECTION_NAME, transport));

        let mut registry = IndexRegistry::new(connections);
        for (alias, entry) in catalog.indexes {
            registry.register(alias, entry.into());
        }

        Ok(Self { registry })
    }
}
