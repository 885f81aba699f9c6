//! RecordStore - the local copy of the `/users` collection and its search view.
//!
//! Local state is never trusted after a mutation: create, update and delete
//! only talk to the backend, and the collection changes exclusively by
//! replacing it wholesale with a fresh `list`.
//!
//! ## Example
//!
//! ```ignore
//! use user_records::{InMemoryBackend, Record, RecordStore};
//!
//! let store = RecordStore::new(InMemoryBackend::new());
//! store.upsert(&Record::new("Ana", "30", "Engineer")).await?;
//! store.refresh().await?;
//! let engineers = store.search("eng");
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::StoreError;
use crate::filter::filter;
use crate::record::{Record, RecordId};

/// What happened to a completed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched collection replaced local state.
    Applied { generation: u64, records: usize },
    /// A newer refresh had already been applied; this result was dropped.
    Stale { generation: u64 },
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied { .. })
    }
}

#[derive(Default)]
struct StoreState {
    records: Vec<Record>,
    view: Vec<Record>,
    query: String,
    applied: u64,
}

/// Authoritative local collection, kept in step with a [`Backend`].
///
/// Clones share state, so overlapping operations can run against the same
/// store. Refreshes carry a generation taken when they are issued; a result
/// older than the last applied one is discarded.
pub struct RecordStore<B> {
    backend: Arc<B>,
    state: Arc<RwLock<StoreState>>,
    issued: Arc<AtomicU64>,
}

impl<B> Clone for RecordStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            state: Arc::clone(&self.state),
            issued: Arc::clone(&self.issued),
        }
    }
}

impl<B: Backend> RecordStore<B> {
    /// Create an empty store. Nothing is fetched until [`refresh`](Self::refresh).
    pub fn new(backend: B) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    /// Create a store over a backend that is shared with other owners.
    pub fn from_arc(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(StoreState::default())),
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch the whole collection and replace local state with it.
    ///
    /// On success the search is reset: the view is the full collection and
    /// the query is empty. On failure nothing local changes.
    pub async fn refresh(&self) -> Result<RefreshOutcome, StoreError> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "refresh issued");

        let records = self.backend.list().await.map_err(StoreError::Fetch)?;

        let mut state = self.write();
        if generation <= state.applied {
            warn!(
                generation,
                applied = state.applied,
                "discarding stale refresh result"
            );
            return Ok(RefreshOutcome::Stale { generation });
        }
        let count = records.len();
        state.applied = generation;
        state.view = records.clone();
        state.records = records;
        state.query.clear();
        debug!(generation, records = count, "refresh applied");
        Ok(RefreshOutcome::Applied {
            generation,
            records: count,
        })
    }

    /// Delete a record, then refresh.
    ///
    /// The delete response is only an acknowledgment; the new collection
    /// always comes from a separate `list`. If the delete fails nothing is
    /// refetched and the record stays in local state.
    pub async fn remove(&self, id: &RecordId) -> Result<RefreshOutcome, StoreError> {
        debug!(%id, "delete issued");
        self.backend
            .delete(id)
            .await
            .map_err(|source| StoreError::Delete {
                id: id.clone(),
                source,
            })?;
        self.refresh().await
    }

    /// Create (`id` absent) or update (`id` present) a record.
    ///
    /// Local state is not touched; call [`refresh`](Self::refresh) afterwards
    /// to observe the result.
    pub async fn upsert(&self, record: &Record) -> Result<(), StoreError> {
        let result = match &record.id {
            Some(id) => {
                debug!(%id, "update issued");
                self.backend.update(id, record).await
            }
            None => {
                debug!("create issued");
                self.backend.create(record).await
            }
        };
        result.map_err(StoreError::Submit)
    }

    /// Set the search query and recompute the view. Returns the new view.
    pub fn search(&self, query: &str) -> Vec<Record> {
        let mut state = self.write();
        let view = filter(&state.records, query);
        state.query = query.to_string();
        state.view = view.clone();
        view
    }
}

impl<B> RecordStore<B> {
    /// Copy of the full collection, in backend order.
    pub fn records(&self) -> Vec<Record> {
        self.read().records.clone()
    }

    /// Copy of the filtered view.
    pub fn view(&self) -> Vec<Record> {
        self.read().view.clone()
    }

    /// The record at a 0-based position of the filtered view.
    pub fn view_row(&self, index: usize) -> Option<Record> {
        self.read().view.get(index).cloned()
    }

    /// The query that produced the current view.
    pub fn query(&self) -> String {
        self.read().query.clone()
    }

    /// Generation of the last applied refresh (0 before the first one).
    pub fn generation(&self) -> u64 {
        self.read().applied
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
