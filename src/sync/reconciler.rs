use chrono::NaiveDate;

use crate::api::ApiClient;
use crate::db::DiaryStore;
use crate::models::RemoteEntry;

/// What happened to a single remote entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// Inserted locally under the given id
    Inserted(i64),
    /// A local entry already exists for the date
    Skipped,
    /// The insert failed; the remaining entries were still processed
    Failed(String),
}

/// Per-item results of one reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub outcomes: Vec<(NaiveDate, ItemOutcome)>,
}

impl SyncReport {
    pub fn fetched(&self) -> usize {
        self.outcomes.len()
    }

    pub fn inserted(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Inserted(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Pulls the remote entry list and inserts what the store is missing.
pub struct Reconciler {
    api: ApiClient,
}

impl Reconciler {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Runs one reconciliation. Returns `false` only if the remote list could
    /// not be fetched; per-item insert failures still count as success.
    pub async fn reconcile(&self, store: &DiaryStore) -> bool {
        self.run(store).await.is_some()
    }

    /// Like [`Reconciler::reconcile`] but returns every item's outcome.
    /// `None` means the fetch failed and the store was not touched.
    pub async fn run(&self, store: &DiaryStore) -> Option<SyncReport> {
        let remote = match self.api.fetch_diaries(store.user_id()).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Sync skipped: {}", e);
                return None;
            }
        };

        let mut report = SyncReport::default();

        // Sequential so an entry inserted earlier in this batch is seen by
        // later entries for the same date.
        for entry in remote {
            let date = entry.date;
            let outcome = merge_entry(store, entry).await;
            report.outcomes.push((date, outcome));
        }

        tracing::info!(
            fetched = report.fetched(),
            inserted = report.inserted(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Sync complete"
        );

        Some(report)
    }
}

async fn merge_entry(store: &DiaryStore, entry: RemoteEntry) -> ItemOutcome {
    if store.get_entry_by_date(entry.date).await.is_some() {
        tracing::debug!(date = %entry.date, "Local entry exists, skipping remote entry");
        return ItemOutcome::Skipped;
    }

    match store
        .add_entry(entry.date, &entry.raw_input, entry.content.as_deref())
        .await
    {
        Ok(id) => {
            tracing::debug!(id, date = %entry.date, "Inserted remote entry");
            ItemOutcome::Inserted(id)
        }
        Err(e) => {
            tracing::warn!(date = %entry.date, "Failed to insert remote entry: {}", e);
            ItemOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_server, unreachable_url};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    struct TestContext {
        store: DiaryStore,
        _temp_dir: TempDir, // Keep alive for duration of test
    }

    fn setup_store() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        TestContext {
            store: DiaryStore::new(temp_dir.path().join("diary.db"), 1),
            _temp_dir: temp_dir,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn remote_with(body: Value) -> Reconciler {
        let router = Router::new().route(
            "/users/{user_id}/diaries",
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
        Reconciler::new(ApiClient::new(spawn_server(router).await))
    }

    #[tokio::test]
    async fn test_local_entry_wins_on_same_date() {
        let ctx = setup_store();
        let store = &ctx.store;
        store
            .add_entry(date("2024-01-01"), "local", Some("Written here."))
            .await
            .unwrap();

        let reconciler = remote_with(json!([
            {"date": "2024-01-01", "rawInput": "remote", "content": "Written elsewhere."},
            {"date": "2024-01-02", "rawInput": "second", "content": "Day two."}
        ]))
        .await;

        assert!(reconciler.reconcile(store).await);

        let entries = store.get_entries().await;
        assert_eq!(entries.len(), 2);

        let first = store.get_entry_by_date(date("2024-01-01")).await.unwrap();
        assert_eq!(first.raw_input, "local");
        assert_eq!(first.content.as_deref(), Some("Written here."));

        let second = store.get_entry_by_date(date("2024-01-02")).await.unwrap();
        assert_eq!(second.raw_input, "second");
        assert_eq!(second.content.as_deref(), Some("Day two."));
    }

    #[tokio::test]
    async fn test_server_error_leaves_store_unchanged() {
        let ctx = setup_store();
        let store = &ctx.store;
        store.add_entry(date("2024-01-01"), "local", None).await.unwrap();

        let router = Router::new().route(
            "/users/{user_id}/diaries",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let reconciler = Reconciler::new(ApiClient::new(spawn_server(router).await));

        assert!(!reconciler.reconcile(store).await);
        assert!(reconciler.run(store).await.is_none());

        let entries = store.get_entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].raw_input, "local");
    }

    #[tokio::test]
    async fn test_unreachable_server_returns_false() {
        let ctx = setup_store();
        let reconciler = Reconciler::new(ApiClient::new(unreachable_url().await));

        assert!(!reconciler.reconcile(&ctx.store).await);
        assert!(ctx.store.get_entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_response_returns_false() {
        let ctx = setup_store();
        let reconciler = remote_with(json!([{"date": "not-a-date", "rawInput": "x"}])).await;

        assert!(!reconciler.reconcile(&ctx.store).await);
        assert!(ctx.store.get_entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_remote_list_succeeds() {
        let ctx = setup_store();
        let reconciler = remote_with(json!([])).await;

        let report = reconciler.run(&ctx.store).await.unwrap();
        assert_eq!(report.fetched(), 0);
        assert!(ctx.store.get_entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_dates_in_remote_list_insert_once() {
        let ctx = setup_store();
        let reconciler = remote_with(json!([
            {"date": "2024-05-01", "rawInput": "first", "content": "one"},
            {"date": "2024-05-01", "rawInput": "again", "content": "two"}
        ]))
        .await;

        let report = reconciler.run(&ctx.store).await.unwrap();
        assert_eq!(report.inserted(), 1);
        assert_eq!(report.skipped(), 1);

        let entries = ctx.store.get_entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].raw_input, "first");
    }

    #[tokio::test]
    async fn test_reconcile_twice_is_stable() {
        let ctx = setup_store();
        let reconciler = remote_with(json!([
            {"date": "2024-05-01", "rawInput": "a", "content": null},
            {"date": "2024-05-02", "rawInput": "b", "content": "bee"}
        ]))
        .await;

        let first = reconciler.run(&ctx.store).await.unwrap();
        assert_eq!(first.inserted(), 2);

        let second = reconciler.run(&ctx.store).await.unwrap();
        assert_eq!(second.inserted(), 0);
        assert_eq!(second.skipped(), 2);
        assert_eq!(ctx.store.get_entries().await.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_failures_are_reported_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let store = DiaryStore::new(blocker.join("diary.db"), 1);

        let reconciler = remote_with(json!([
            {"date": "2024-05-01", "rawInput": "a", "content": null},
            {"date": "2024-05-02", "rawInput": "b", "content": null}
        ]))
        .await;

        let report = reconciler.run(&store).await.unwrap();
        assert_eq!(report.fetched(), 2);
        assert_eq!(report.failed(), 2);
        assert!(matches!(report.outcomes[1].1, ItemOutcome::Failed(_)));
    }
}
