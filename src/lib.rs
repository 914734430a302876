//! Keyword diary core.
//!
//! Entries are kept in a local SQLite store keyed by date. On start-up the
//! store is opened once and the server's copy of the diary is merged in,
//! keeping whatever was written locally for a date.

pub mod api;
pub mod compose;
pub mod config;
pub mod db;
pub mod history;
pub mod models;
pub mod session;
pub mod sync;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, ApiError};
pub use compose::{compose, ComposeError, Composed};
pub use config::{Config, ConfigError};
pub use db::{DiaryStore, StoreError};
pub use history::History;
pub use models::{DiaryEntry, RemoteEntry};
pub use session::Session;
pub use sync::{Reconciler, SyncReport};
