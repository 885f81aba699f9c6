//! Error types for backend calls, the record store, the edit session and
//! configuration.

use thiserror::Error;

use crate::record::RecordId;

/// Failure of a single call against the `/users` resource.
///
/// Transport failures and non-2xx statuses are the only distinctions made;
/// backend error payloads are kept as text and never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Connection refused, reset, DNS failure, timeout.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The backend answered with a non-success status.
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },
    /// A list response body was not an array of records.
    #[error("could not decode backend response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Shorthand for a status failure with an empty body.
    pub fn status(status: u16) -> Self {
        BackendError::Status {
            status,
            body: String::new(),
        }
    }

    /// Whether retrying the same call could succeed.
    ///
    /// Transport failures, server errors, 408 and 429 are transient; any other
    /// status is the backend rejecting the request.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Transport(_) => true,
            BackendError::Status { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            BackendError::Decode(_) => false,
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            BackendError::status(status.as_u16())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

/// Error returned by [`RecordStore`](crate::RecordStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Listing the collection failed; local state is unchanged.
    #[error("fetching users failed: {0}")]
    Fetch(#[source] BackendError),
    /// Create or update failed; local state is unchanged.
    #[error("submitting user failed: {0}")]
    Submit(#[source] BackendError),
    /// Delete failed; the record is still present locally.
    #[error("deleting user {id} failed: {source}")]
    Delete {
        id: RecordId,
        #[source]
        source: BackendError,
    },
}

impl StoreError {
    /// The backend failure underneath this error.
    pub fn backend(&self) -> &BackendError {
        match self {
            StoreError::Fetch(e) | StoreError::Submit(e) => e,
            StoreError::Delete { source, .. } => source,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.backend().is_retryable()
    }
}

/// Error returned by [`EditSession`](crate::EditSession) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The operation needs an open session.
    #[error("edit session is not open")]
    NotOpen,
    /// Form field name that is not part of a record.
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Error building a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid base url {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base url {0:?} cannot carry a path")]
    CannotBeABase(String),
    #[error("invalid timeout {0:?}: expected whole seconds")]
    InvalidTimeout(String),
}
