//! Backend - the remote `/users` collection, as seen by the client.
//!
//! The record store talks to the backend only through this trait, so it can
//! run against a real REST service or an in-memory stand-in.
//!
//! ## Example
//!
//! ```ignore
//! use user_records::{Backend, InMemoryBackend, Record};
//!
//! let backend = InMemoryBackend::new();
//! backend.create(&Record::new("Ana", "30", "Engineer")).await?;
//! let all = backend.list().await?;
//! ```

mod in_memory;

#[cfg(feature = "http")]
mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BackendError;
use crate::record::{Record, RecordId};

/// The four operations of the `/users` resource.
///
/// Only `list` has an interpreted response body. Create, update and delete
/// report success or failure; the caller refetches to observe the result.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /users` - the whole collection in backend order.
    async fn list(&self) -> Result<Vec<Record>, BackendError>;

    /// `POST /users` - create a record. Any id on `record` is ignored.
    async fn create(&self, record: &Record) -> Result<(), BackendError>;

    /// `PATCH /users/{id}` - update the record with the given id.
    async fn update(&self, id: &RecordId, record: &Record) -> Result<(), BackendError>;

    /// `DELETE /users/{id}`
    async fn delete(&self, id: &RecordId) -> Result<(), BackendError>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn list(&self) -> Result<Vec<Record>, BackendError> {
        (**self).list().await
    }

    async fn create(&self, record: &Record) -> Result<(), BackendError> {
        (**self).create(record).await
    }

    async fn update(&self, id: &RecordId, record: &Record) -> Result<(), BackendError> {
        (**self).update(id, record).await
    }

    async fn delete(&self, id: &RecordId) -> Result<(), BackendError> {
        (**self).delete(id).await
    }
}

/// A backend call, as recorded by [`InMemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    List,
    Create(Record),
    Update(RecordId, Record),
    Delete(RecordId),
}

/// Which backend operation a call or injected failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl BackendCall {
    pub fn operation(&self) -> Operation {
        match self {
            BackendCall::List => Operation::List,
            BackendCall::Create(_) => Operation::Create,
            BackendCall::Update(..) => Operation::Update,
            BackendCall::Delete(_) => Operation::Delete,
        }
    }
}

pub use in_memory::InMemoryBackend;

#[cfg(feature = "http")]
pub use http::HttpBackend;
