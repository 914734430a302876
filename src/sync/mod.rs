//! Merges the server's diary list into the local store.
//!
//! Reconciliation is one-way and additive: a remote entry is inserted only
//! when no local entry exists for its date. Local entries are never changed,
//! so the first write for a date wins.

mod reconciler;

pub use reconciler::{ItemOutcome, Reconciler, SyncReport};
