//! App - wires the record store and the edit session to user actions.
//!
//! This is the boundary where backend failures stop: every failure is logged
//! here and turned into an outcome value. The rendering surface only sees
//! that the expected change did not happen.

use tracing::{error, info, warn};

use crate::backend::Backend;
use crate::error::{SessionError, StoreError};
use crate::record::Record;
use crate::session::{EditSession, SubmitOutcome};
use crate::store::{RecordStore, RefreshOutcome};
use crate::view;

/// Prompt shown before a delete is issued.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this user?";

/// Synchronous yes/no gate in front of destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a delete action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Deleted and refetched.
    Deleted,
    /// Deleted on the backend, but the follow-up refresh failed, so the row
    /// may still be shown until the next successful refresh.
    DeletedNotRefreshed,
    /// The user declined; nothing was sent.
    Declined,
    /// No row with that number in the current view.
    NoSuchRow(usize),
    /// The record has no id, so there is nothing to delete remotely.
    NotPersisted(usize),
    /// The delete or the follow-up refresh failed; see the log.
    Failed,
}

pub struct App<B> {
    store: RecordStore<B>,
    session: EditSession,
}

impl<B: Backend> App<B> {
    pub fn new(backend: B) -> Self {
        Self::with_store(RecordStore::new(backend))
    }

    pub fn with_store(store: RecordStore<B>) -> Self {
        Self {
            store,
            session: EditSession::new(),
        }
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Hydrate (or re-hydrate) the store. Returns whether fresh data was applied.
    pub async fn mount(&self) -> bool {
        match self.store.refresh().await {
            Ok(RefreshOutcome::Applied { records, .. }) => {
                info!(records, "users loaded");
                true
            }
            Ok(RefreshOutcome::Stale { .. }) => false,
            Err(err) => {
                error!(error = %err, retryable = err.is_retryable(), "error fetching users");
                false
            }
        }
    }

    /// Recompute the view for a new query. Returns the number of visible rows.
    pub fn search(&self, query: &str) -> usize {
        self.store.search(query).len()
    }

    /// The record at a 1-based row of the current view.
    pub fn row(&self, row: usize) -> Option<Record> {
        row.checked_sub(1)
            .and_then(|index| self.store.view_row(index))
    }

    /// Open the modal with an empty draft.
    pub fn add_record(&mut self) {
        self.session.open_add();
    }

    /// Open the modal on a copy of the record at `row`. Returns false when
    /// the row does not exist.
    pub fn edit_row(&mut self, row: usize) -> bool {
        match self.row(row) {
            Some(record) => {
                self.session.open_edit(&record);
                true
            }
            None => false,
        }
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), SessionError> {
        self.session.set_field_by_name(name, value)
    }

    /// Submit the draft. On failure the modal stays open and the error is logged.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, SessionError> {
        let outcome = self.session.submit(&self.store).await?;
        if let SubmitOutcome::Failure(err) = &outcome {
            error!(error = %err, retryable = err.is_retryable(), "error submitting user");
        }
        Ok(outcome)
    }

    /// Close the modal without saving.
    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    /// Delete the record at `row` after asking `confirm`.
    pub async fn delete_row(&self, row: usize, confirm: &impl Confirm) -> DeleteOutcome {
        let Some(record) = self.row(row) else {
            return DeleteOutcome::NoSuchRow(row);
        };
        let Some(id) = record.id else {
            return DeleteOutcome::NotPersisted(row);
        };
        if !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome::Declined;
        }
        match self.store.remove(&id).await {
            Ok(_) => DeleteOutcome::Deleted,
            Err(err @ StoreError::Fetch(_)) => {
                warn!(%id, error = %err, "user deleted but refresh failed");
                DeleteOutcome::DeletedNotRefreshed
            }
            Err(err) => {
                error!(error = %err, retryable = err.is_retryable(), "error deleting user");
                DeleteOutcome::Failed
            }
        }
    }

    /// Current screen: search line, table and the modal when open.
    pub fn render(&self) -> String {
        view::render(&self.store.query(), &self.store.view(), &self.session)
    }
}
