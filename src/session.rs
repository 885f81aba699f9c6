//! EditSession - the create/update modal as a small state machine.
//!
//! ```text
//! Closed --open_add--------> Open(empty draft)
//! Closed --open_edit(r)----> Open(copy of r)
//! Open   --set_field-------> Open(draft with one field replaced)
//! Open   --cancel----------> Closed
//! Open   --submit ok-------> Closed (store refreshed)
//! Open   --submit failed---> Open (draft kept)
//! ```
//!
//! Nothing survives a closure: every open starts from a fresh draft.

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::{SessionError, StoreError};
use crate::record::{Field, Record};
use crate::store::RecordStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Closed,
    Open(Record),
}

/// Whether the open draft creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Add,
    Edit,
}

/// Result of submitting the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend accepted the draft; the session is closed.
    Success,
    /// The backend rejected the draft or was unreachable; the session is
    /// still open with the draft unchanged, so the caller can retry or cancel.
    Failure(StoreError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    state: SessionState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open(_))
    }

    /// The draft being edited, if the session is open.
    pub fn draft(&self) -> Option<&Record> {
        match &self.state {
            SessionState::Open(draft) => Some(draft),
            SessionState::Closed => None,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        self.draft().map(|draft| {
            if draft.is_new() {
                Mode::Add
            } else {
                Mode::Edit
            }
        })
    }

    /// Open with an empty draft, discarding whatever was open before.
    pub fn open_add(&mut self) {
        self.state = SessionState::Open(Record::default());
    }

    /// Open with a copy of `record`.
    pub fn open_edit(&mut self, record: &Record) {
        self.state = SessionState::Open(record.clone());
    }

    /// Replace one field of the draft. Values are taken as-is.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), SessionError> {
        match &mut self.state {
            SessionState::Open(draft) => {
                draft.set(field, value);
                Ok(())
            }
            SessionState::Closed => Err(SessionError::NotOpen),
        }
    }

    /// Like [`set_field`](Self::set_field), addressing the field by form name.
    pub fn set_field_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<(), SessionError> {
        let field: Field = name.parse()?;
        self.set_field(field, value)
    }

    /// Close without touching the backend.
    pub fn cancel(&mut self) {
        self.state = SessionState::Closed;
    }

    /// Send the draft to the backend.
    ///
    /// On success the session closes and the store is refreshed. A failed
    /// refresh is logged here, since the outcome stays `Success` and callers
    /// never see it, and does not reopen the session.
    pub async fn submit<B: Backend>(
        &mut self,
        store: &RecordStore<B>,
    ) -> Result<SubmitOutcome, SessionError> {
        let draft = self.draft().cloned().ok_or(SessionError::NotOpen)?;

        if let Err(err) = store.upsert(&draft).await {
            warn!(error = %err, retryable = err.is_retryable(), "submit failed, keeping draft");
            return Ok(SubmitOutcome::Failure(err));
        }

        self.state = SessionState::Closed;
        match store.refresh().await {
            Ok(outcome) => debug!(?outcome, "refreshed after submit"),
            Err(err) => warn!(
                error = %err,
                retryable = err.is_retryable(),
                "user saved but refresh after submit failed"
            ),
        }
        Ok(SubmitOutcome::Success)
    }

    /// Modal heading for the current mode.
    pub fn title(&self) -> Option<&'static str> {
        self.mode().map(|mode| match mode {
            Mode::Add => "Add Record",
            Mode::Edit => "Update Record",
        })
    }

    /// Submit button label for the current mode.
    pub fn submit_label(&self) -> Option<&'static str> {
        self.mode().map(|mode| match mode {
            Mode::Add => "Add User",
            Mode::Edit => "Update User",
        })
    }
}
