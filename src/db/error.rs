//! Store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the diary store's write path.
///
/// Read failures never appear here: reads log and return an empty or absent
/// result instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened or its schema could not be created.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] OpenError),

    /// An insert, update or delete failed.
    #[error("write failed: {0}")]
    WriteFailure(#[source] sqlx::Error),
}

/// Reasons opening the database can fail.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("cannot create directory '{}': {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("cannot apply schema: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl From<OpenError> for StoreError {
    fn from(e: OpenError) -> Self {
        StoreError::StorageUnavailable(e)
    }
}
