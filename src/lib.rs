//! user_records - a client-side manager for a REST `/users` collection.
//!
//! Lists, searches, creates, edits and deletes user records, and keeps the
//! local list in step with the server by refetching the whole collection
//! after every mutation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use user_records::{App, ClientConfig, HttpBackend};
//!
//! let backend = HttpBackend::new(ClientConfig::from_env()?)?;
//! let mut app = App::new(backend);
//! app.mount().await;
//!
//! app.add_record();
//! app.set_field("name", "Ana")?;
//! app.set_field("age", "30")?;
//! app.set_field("profession", "Engineer")?;
//! app.submit().await?;
//!
//! app.search("eng");
//! println!("{}", app.render());
//! ```

mod app;
mod backend;
mod config;
mod error;
mod filter;
mod record;
mod session;
mod store;
pub mod view;

pub use app::{App, Confirm, DeleteOutcome, DELETE_PROMPT};
pub use backend::{Backend, BackendCall, InMemoryBackend, Operation};
pub use config::{ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL, TIMEOUT_ENV};
pub use error::{BackendError, ConfigError, SessionError, StoreError};
pub use filter::filter;
pub use record::{Field, Record, RecordId};
pub use session::{EditSession, Mode, SessionState, SubmitOutcome};
pub use store::{RecordStore, RefreshOutcome};

#[cfg(feature = "http")]
pub use backend::HttpBackend;
