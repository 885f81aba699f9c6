//! A json-server style `/users` resource served by axum on an ephemeral port.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde_json::{json, Value};

/// One request as the mock server saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct MockUsers {
    records: Mutex<Vec<Value>>,
    next_id: Mutex<u64>,
    seen: Mutex<Vec<Seen>>,
    fail_next: Mutex<Option<StatusCode>>,
    list_override: Mutex<Option<Value>>,
    delete_reply: Mutex<Option<Value>>,
}

pub type Shared = Arc<MockUsers>;

impl MockUsers {
    pub fn with_records(records: Vec<Value>) -> Shared {
        let mock = MockUsers::default();
        *mock.next_id.lock().unwrap() = records.len() as u64 + 1;
        *mock.records.lock().unwrap() = records;
        Arc::new(mock)
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<Value> {
        self.records.lock().unwrap().clone()
    }

    /// Answer the next request, whatever it is, with `status`.
    pub fn fail_next(&self, status: StatusCode) {
        *self.fail_next.lock().unwrap() = Some(status);
    }

    /// Serve `body` for every list request.
    pub fn override_list(&self, body: Value) {
        *self.list_override.lock().unwrap() = Some(body);
    }

    /// Body returned by successful deletes (json-server returns the removed item).
    pub fn reply_to_delete_with(&self, body: Value) {
        *self.delete_reply.lock().unwrap() = Some(body);
    }

    fn record(&self, method: &'static str, path: String, body: Option<Value>) -> Option<Response> {
        self.seen.lock().unwrap().push(Seen { method, path, body });
        self.fail_next
            .lock()
            .unwrap()
            .take()
            .map(|status| (status, Json(json!({ "error": "injected" }))).into_response())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.lock().unwrap().iter().position(|r| match &r["id"] {
            Value::String(s) => s == id,
            other => other.to_string() == id,
        })
    }
}

pub fn router(state: Shared) -> Router {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/:id", patch(update).delete(remove))
        .with_state(state)
}

/// Bind to port 0, serve `app`, and return the base URL.
pub async fn start_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn list(State(state): State<Shared>) -> Response {
    if let Some(failure) = state.record("GET", "/users".into(), None) {
        return failure;
    }
    if let Some(body) = state.list_override.lock().unwrap().clone() {
        return Json(body).into_response();
    }
    Json(Value::Array(state.records())).into_response()
}

async fn create(State(state): State<Shared>, Json(mut body): Json<Value>) -> Response {
    if let Some(failure) = state.record("POST", "/users".into(), Some(body.clone())) {
        return failure;
    }
    let id = {
        let mut next = state.next_id.lock().unwrap();
        let id = *next;
        *next += 1;
        id
    };
    body["id"] = json!(id);
    state.records.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) = state.record("PATCH", format!("/users/{id}"), Some(body.clone())) {
        return failure;
    }
    let Some(index) = state.position(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let mut records = state.records.lock().unwrap();
    if let (Some(stored), Some(patch)) = (records[index].as_object_mut(), body.as_object()) {
        for (key, value) in patch {
            if key != "id" {
                stored.insert(key.clone(), value.clone());
            }
        }
    }
    Json(records[index].clone()).into_response()
}

async fn remove(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    if let Some(failure) = state.record("DELETE", format!("/users/{id}"), None) {
        return failure;
    }
    let Some(index) = state.position(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let removed = state.records.lock().unwrap().remove(index);
    let reply = state.delete_reply.lock().unwrap().clone().unwrap_or(removed);
    Json(reply).into_response()
}
