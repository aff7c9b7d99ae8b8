//! OpenSearch transport implementation.

use async_trait::async_trait;
use opensearch::cluster::ClusterHealthParts;
use opensearch::http::request::JsonBody;
use opensearch::http::response::Response;
use opensearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use opensearch::indices::{
    IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesPutMappingParts,
};
use opensearch::{BulkParts, GetParts, OpenSearch, SearchParts};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::errors::IndexError;
use crate::interfaces::SearchTransport;

/// Engine transport backed by the OpenSearch client.
///
/// Network policy beyond a single request (retry, backoff) is not
/// implemented here; callers that need it wrap the transport.
pub struct OpenSearchTransport {
    client: OpenSearch,
}

impl OpenSearchTransport {
    /// Create a transport connected to the specified URL.
    pub fn new(url: &str) -> Result<Self, IndexError> {
        let parsed_url = Url::parse(url).map_err(|e| IndexError::transport(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| IndexError::transport(e.to_string()))?;

        info!(url = %url, "Created OpenSearch transport");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Read a response body as JSON, failing on non-success status.
    async fn read_json(response: Response) -> Result<Value, IndexError> {
        let status = response.status_code();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Engine request failed");
            return Err(IndexError::response(format!(
                "Request failed with status {}: {}",
                status, body
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| IndexError::parse(e.to_string()))
    }

    /// Read an acknowledgement response, returning the acknowledged flag.
    async fn read_acknowledged(response: Response) -> Result<bool, IndexError> {
        let body = Self::read_json(response).await?;
        Ok(body
            .get("acknowledged")
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }
}

#[async_trait]
impl SearchTransport for OpenSearchTransport {
    async fn search(&self, index: &str, body: Value) -> Result<Value, IndexError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| IndexError::transport(e.to_string()))?;

        debug!(index = %index, "Executed search");
        Self::read_json(response).await
    }

    async fn get(&self, index: &str, id: &str) -> Result<Option<Value>, IndexError> {
        let response = self
            .client
            .get(GetParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| IndexError::transport(e.to_string()))?;

        // 404 means the document does not exist.
        if response.status_code().as_u16() == 404 {
            return Ok(None);
        }

        Self::read_json(response).await.map(Some)
    }

    async fn bulk(&self, index: &str, operations: Vec<Value>) -> Result<Value, IndexError> {
        let body: Vec<JsonBody<Value>> = operations.into_iter().map(Into::into).collect();

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| IndexError::transport(e.to_string()))?;

        debug!(index = %index, "Executed bulk request");
        Self::read_json(response).await
    }

    async fn create_index(&self, index: &str, body: Value) -> Result<bool, IndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| IndexError::transport(e.to_string()))?;

        Self::read_acknowledged(response).await
    }

    async fn update_index(&self, index: &str, mappings: Value) -> Result<bool, IndexError> {
        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[index]))
            .body(mappings)
            .send()
            .await
            .map_err(|e| IndexError::transport(e.to_string()))?;

        Self::read_acknowledged(response).await
    }

    async fn delete_index(&self, index: &str) -> Result<bool, IndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| IndexError::transport(e.to_string()))?;

        Self::read_acknowledged(response).await
    }

    async fn index_exists(&self, index: &str) -> Result<bool, IndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| IndexError::transport(e.to_string()))?;

        Ok(response.status_code().is_success())
    }

    async fn health_check(&self) -> Result<bool, IndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| IndexError::transport(e.to_string()))?;

        let body = Self::read_json(response).await?;
        let status = body.get("status").and_then(Value::as_str).unwrap_or("red");

        Ok(status == "green" || status == "yellow")
    }
}
