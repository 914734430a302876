//! HTTP client for the remote diary service.
//!
//! The service generates diary prose from a keyword, answers free-form
//! questions about past entries, and lists every entry it holds for a user.
//! The list is what the reconciler merges into the local store.

mod client;
mod error;

pub use client::ApiClient;
pub use error::ApiError;
