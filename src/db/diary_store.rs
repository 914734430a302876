use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;

use super::{init_db, OpenError, StoreError};
use crate::models::DiaryEntry;

/// Local store of diary entries.
///
/// The database is opened lazily: the first operation (or an explicit
/// [`DiaryStore::initialize`]) opens the pool and applies the schema, and
/// every later call reuses that pool. Concurrent first callers wait on the
/// same initialization instead of opening a second handle.
///
/// Writes propagate [`StoreError`]. Reads never fail: errors are logged and
/// replaced with an empty list or `None`.
pub struct DiaryStore {
    path: PathBuf,
    user_id: i64,
    pool: OnceCell<SqlitePool>,
}

#[derive(sqlx::FromRow)]
struct DiaryRow {
    id: i64,
    user_id: i64,
    date: String,
    raw_input: String,
    content: Option<String>,
    img_url: Option<String>,
    created_at: String,
    last_modified: String,
}

impl DiaryRow {
    fn into_entry(self) -> Option<DiaryEntry> {
        let date = match NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                tracing::warn!(id = self.id, "Skipping diary row with malformed date '{}'", self.date);
                return None;
            }
        };

        let (created_at, last_modified) = match (
            parse_timestamp(&self.created_at),
            parse_timestamp(&self.last_modified),
        ) {
            (Some(created_at), Some(last_modified)) => (created_at, last_modified),
            _ => {
                tracing::warn!(
                    id = self.id,
                    "Skipping diary row with malformed timestamps '{}' / '{}'",
                    self.created_at,
                    self.last_modified
                );
                return None;
            }
        };

        Some(DiaryEntry {
            id: self.id,
            user_id: self.user_id,
            date,
            raw_input: self.raw_input,
            content: self.content,
            img_url: self.img_url,
            created_at,
            last_modified,
        })
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

impl DiaryStore {
    /// Creates a store for the database at `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>, user_id: i64) -> Self {
        Self {
            path: path.into(),
            user_id,
            pool: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The single user every new entry is written for.
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.initialized()
    }

    /// Opens the database and applies the schema. Calling it again is a no-op.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        self.pool().await?;
        Ok(())
    }

    async fn pool(&self) -> Result<&SqlitePool, OpenError> {
        self.pool
            .get_or_try_init(|| async {
                tracing::debug!("Opening diary database at {}", self.path.display());
                init_db(&self.path).await
            })
            .await
    }

    /// Inserts an entry for `date` and returns its new id.
    ///
    /// No check is made for an existing entry on the same date.
    pub async fn add_entry(
        &self,
        date: NaiveDate,
        raw_input: &str,
        content: Option<&str>,
    ) -> Result<i64, StoreError> {
        let pool = self.pool().await?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO diary (user_id, date, raw_input, content, created_at, last_modified)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(self.user_id)
        .bind(date.to_string())
        .bind(raw_input)
        .bind(content)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await
        .map_err(|e| write_failure("add", e))?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, %date, "Added diary entry");
        Ok(id)
    }

    /// Replaces the content of entry `id`.
    ///
    /// A missing id is not an error; the return value tells whether a row
    /// was actually changed.
    pub async fn update_entry(&self, id: i64, content: &str) -> Result<bool, StoreError> {
        let pool = self.pool().await?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query("UPDATE diary SET content = ?, last_modified = ? WHERE id = ?")
            .bind(content)
            .bind(&now)
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| write_failure("update", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes entry `id`. Returns whether a row was deleted.
    pub async fn delete_entry(&self, id: i64) -> Result<bool, StoreError> {
        let pool = self.pool().await?;

        let result = sqlx::query("DELETE FROM diary WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| write_failure("delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// All entries, newest date first. Empty on any failure.
    pub async fn get_entries(&self) -> Vec<DiaryEntry> {
        let pool = match self.pool().await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!("Failed to read diary entries: {}", e);
                return Vec::new();
            }
        };

        let rows: Vec<DiaryRow> = match sqlx::query_as("SELECT * FROM diary ORDER BY date DESC, id")
            .fetch_all(pool)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Failed to read diary entries: {}", e);
                return Vec::new();
            }
        };

        rows.into_iter().filter_map(DiaryRow::into_entry).collect()
    }

    /// The entry for `date`, picking the lowest id if several share the date.
    pub async fn get_entry_by_date(&self, date: NaiveDate) -> Option<DiaryEntry> {
        self.fetch_one(
            "SELECT * FROM diary WHERE date = ? ORDER BY id LIMIT 1",
            date.to_string(),
        )
        .await
    }

    pub async fn get_entry(&self, id: i64) -> Option<DiaryEntry> {
        self.fetch_one("SELECT * FROM diary WHERE id = ?", id).await
    }

    async fn fetch_one<'q, T>(&self, sql: &'q str, key: T) -> Option<DiaryEntry>
    where
        T: 'q + Send + sqlx::Encode<'q, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
    {
        let pool = match self.pool().await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!("Failed to read diary entry: {}", e);
                return None;
            }
        };

        match sqlx::query_as::<_, DiaryRow>(sql)
            .bind(key)
            .fetch_optional(pool)
            .await
        {
            Ok(row) => row.and_then(DiaryRow::into_entry),
            Err(e) => {
                tracing::warn!("Failed to read diary entry: {}", e);
                None
            }
        }
    }
}

fn write_failure(action: &str, e: sqlx::Error) -> StoreError {
    tracing::error!("Failed to {} diary entry: {}", action, e);
    StoreError::WriteFailure(e)
}
