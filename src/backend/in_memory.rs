//! InMemoryBackend - Vec-backed `/users` collection for testing and development.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{Backend, BackendCall, Operation};
use crate::error::BackendError;
use crate::record::{Record, RecordId};

struct State {
    records: Vec<Record>,
    next_id: u64,
    calls: Vec<BackendCall>,
    failures: HashMap<Operation, VecDeque<BackendError>>,
}

/// In-memory backend behaving like a json-server `/users` resource.
///
/// Ids are assigned as increasing numbers in creation order. Every call is
/// recorded, and failures can be queued per operation. Clone-friendly via Arc;
/// clones share the same collection.
#[derive(Clone)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                records: Vec::new(),
                next_id: 1,
                calls: Vec::new(),
                failures: HashMap::new(),
            })),
        }
    }

    /// Seed the collection. Records without an id get the next free one.
    /// Seeding is not recorded as calls.
    pub fn with_records(self, records: impl IntoIterator<Item = Record>) -> Self {
        {
            let mut state = self.lock();
            for mut record in records {
                match &record.id {
                    Some(RecordId::Number(n)) => state.next_id = state.next_id.max(n + 1),
                    Some(RecordId::Text(_)) => {}
                    None => {
                        record.id = Some(RecordId::Number(state.next_id));
                        state.next_id += 1;
                    }
                }
                state.records.push(record);
            }
        }
        self
    }

    /// Make the next call of `operation` fail with `error`. Queued failures
    /// are consumed one per call, in order.
    pub fn fail_next(&self, operation: Operation, error: BackendError) {
        self.lock()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Snapshot of the stored collection.
    pub fn records(&self) -> Vec<Record> {
        self.lock().records.clone()
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Number of calls received for one operation.
    pub fn call_count(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and pop an injected failure for it, if any.
    fn begin(state: &mut State, call: BackendCall) -> Result<(), BackendError> {
        let operation = call.operation();
        state.calls.push(call);
        match state
            .failures
            .get_mut(&operation)
            .and_then(|queue| queue.pop_front())
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn position(state: &State, id: &RecordId) -> Result<usize, BackendError> {
        state
            .records
            .iter()
            .position(|r| r.id.as_ref() == Some(id))
            .ok_or_else(|| BackendError::Status {
                status: 404,
                body: format!("user {} not found", id),
            })
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn list(&self) -> Result<Vec<Record>, BackendError> {
        let mut state = self.lock();
        Self::begin(&mut state, BackendCall::List)?;
        Ok(state.records.clone())
    }

    async fn create(&self, record: &Record) -> Result<(), BackendError> {
        let mut state = self.lock();
        Self::begin(&mut state, BackendCall::Create(record.clone()))?;
        let mut created = record.clone();
        created.id = Some(RecordId::Number(state.next_id));
        state.next_id += 1;
        state.records.push(created);
        Ok(())
    }

    async fn update(&self, id: &RecordId, record: &Record) -> Result<(), BackendError> {
        let mut state = self.lock();
        Self::begin(&mut state, BackendCall::Update(id.clone(), record.clone()))?;
        let index = Self::position(&state, id)?;
        let stored = &mut state.records[index];
        stored.name = record.name.clone();
        stored.age = record.age.clone();
        stored.profession = record.profession.clone();
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), BackendError> {
        let mut state = self.lock();
        Self::begin(&mut state, BackendCall::Delete(id.clone()))?;
        let index = Self::position(&state, id)?;
        state.records.remove(index);
        Ok(())
    }
}
