//! Process start-up: open the store, then reconcile with the server once.

use tokio::sync::OnceCell;

use crate::db::{DiaryStore, StoreError};
use crate::sync::Reconciler;

/// Owns the store for the lifetime of the process and makes sure the
/// reconciler runs at most once, however many callers ask to start.
pub struct Session {
    store: DiaryStore,
    reconciler: Option<Reconciler>,
    synced: OnceCell<bool>,
}

impl Session {
    /// A session that reconciles with `reconciler` on start.
    pub fn new(store: DiaryStore, reconciler: Reconciler) -> Self {
        Self {
            store,
            reconciler: Some(reconciler),
            synced: OnceCell::new(),
        }
    }

    /// A session that never talks to the server.
    pub fn offline(store: DiaryStore) -> Self {
        Self {
            store,
            reconciler: None,
            synced: OnceCell::new(),
        }
    }

    pub fn store(&self) -> &DiaryStore {
        &self.store
    }

    /// Initializes the store and, the first time only, reconciles.
    ///
    /// Storage failures propagate. A failed sync does not: it is reported as
    /// `Some(false)`. Offline sessions return `None`.
    pub async fn start(&self) -> Result<Option<bool>, StoreError> {
        self.store.initialize().await?;

        let reconciler = match &self.reconciler {
            Some(reconciler) => reconciler,
            None => return Ok(None),
        };

        let synced = *self
            .synced
            .get_or_init(|| reconciler.reconcile(&self.store))
            .await;
        Ok(Some(synced))
    }
}
