//! Writing a new entry: keyword in, generated diary prose out.

use chrono::NaiveDate;
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::db::{DiaryStore, StoreError};

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Please write something in your diary.")]
    EmptyInput,

    #[error("could not generate diary entry: {0}")]
    Generation(#[from] ApiError),

    #[error("could not save diary entry: {0}")]
    Store(#[from] StoreError),
}

/// A freshly written and saved entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Composed {
    pub id: i64,
    pub date: NaiveDate,
    pub content: String,
}

/// Generates the entry for `raw_input` and saves it under `date`.
///
/// Nothing is stored unless generation succeeds.
pub async fn compose(
    store: &DiaryStore,
    api: &ApiClient,
    date: NaiveDate,
    raw_input: &str,
) -> Result<Composed, ComposeError> {
    let raw_input = raw_input.trim();
    if raw_input.is_empty() {
        return Err(ComposeError::EmptyInput);
    }

    let content = api.generate(store.user_id(), date, raw_input).await?;
    let id = store.add_entry(date, raw_input, Some(&content)).await?;

    Ok(Composed { id, date, content })
}
