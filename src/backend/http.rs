//! HTTP backend - the `/users` resource over REST.
//!
//! Requires the `http` feature. Uses reqwest.
//!
//! ## Routes
//!
//! - `GET /users` - list
//! - `POST /users` - create
//! - `PATCH /users/{id}` - update
//! - `DELETE /users/{id}` - delete

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

use super::Backend;
use crate::config::ClientConfig;
use crate::error::BackendError;
use crate::record::{Record, RecordId};

/// REST client for the `/users` collection.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    /// Build a client for the configured base URL.
    pub fn new(config: ClientConfig) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    /// Use an existing reqwest client (shared connection pool, custom TLS).
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send the request and turn transport failures and non-2xx statuses
    /// into errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Drain a mutation response; its body is logged but never interpreted.
    async fn acknowledge(&self, operation: &str, response: Response) -> Result<(), BackendError> {
        let status = response.status();
        let body = response.text().await?;
        debug!(operation, status = status.as_u16(), body = %body, "backend acknowledged");
        Ok(())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list(&self) -> Result<Vec<Record>, BackendError> {
        let url = self.config.collection_url();
        debug!(%url, "GET");
        let response = self.send(self.client.get(url)).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn create(&self, record: &Record) -> Result<(), BackendError> {
        let url = self.config.collection_url();
        debug!(%url, "POST");
        // the backend assigns ids, so never send one on create
        let body = Record {
            id: None,
            ..record.clone()
        };
        let response = self.send(self.client.post(url).json(&body)).await?;
        self.acknowledge("create", response).await
    }

    async fn update(&self, id: &RecordId, record: &Record) -> Result<(), BackendError> {
        let url = self.config.item_url(id);
        debug!(%url, "PATCH");
        let response = self.send(self.client.patch(url).json(record)).await?;
        self.acknowledge("update", response).await
    }

    async fn delete(&self, id: &RecordId) -> Result<(), BackendError> {
        let url = self.config.item_url(id);
        debug!(%url, "DELETE");
        let response = self.send(self.client.delete(url)).await?;
        self.acknowledge("delete", response).await
    }
}
