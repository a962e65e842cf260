// Session - one queue store wired to the JSON state file

use anyhow::{Context, Result};
use queuesnip_core::application::QueueService;
use queuesnip_core::domain::ShopConfig;
use queuesnip_core::port::{SequentialIdProvider, SnapshotStore, SystemTimeProvider};
use queuesnip_infra_json::JsonSnapshotStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::state_lock::{lock_path_for, StateLock};

/// Queue store plus the snapshot file it is loaded from and saved to
///
/// Changes go through [`Session::transact`], which holds the state lock
/// from reload to save so sessions in other processes cannot interleave.
pub struct Session {
    queue: QueueService,
    store: Arc<dyn SnapshotStore>,
    lock_path: Option<PathBuf>,
}

impl Session {
    pub async fn open(shop: ShopConfig, state_path: PathBuf) -> Result<Self> {
        let lock_path = lock_path_for(&state_path);
        let store: Arc<dyn SnapshotStore> = Arc::new(JsonSnapshotStore::new(state_path));
        Self::build(shop, store, Some(lock_path)).await
    }

    /// Session over any store, without cross-process locking
    pub async fn with_store(shop: ShopConfig, store: Arc<dyn SnapshotStore>) -> Result<Self> {
        Self::build(shop, store, None).await
    }

    async fn build(
        shop: ShopConfig,
        store: Arc<dyn SnapshotStore>,
        lock_path: Option<PathBuf>,
    ) -> Result<Self> {
        let (catalog, roster) = shop.into_parts().context("Invalid shop configuration")?;

        // DI wiring
        let queue = QueueService::new(
            catalog,
            roster,
            Arc::new(SequentialIdProvider::new()),
            Arc::new(SystemTimeProvider),
        );

        let session = Self {
            queue,
            store,
            lock_path,
        };
        session.reload().await?;
        Ok(session)
    }

    pub fn queue(&self) -> &QueueService {
        &self.queue
    }

    /// Replace in-memory state with the last saved snapshot, if any
    pub async fn reload(&self) -> Result<()> {
        let Some(snapshot) = self.store.load().await.context("Failed to load queue state")? else {
            return Ok(());
        };

        let report = self
            .queue
            .restore(snapshot)
            .context("Failed to restore queue state")?;

        if report.dropped_unknown_barber + report.dropped_invalid + report.demoted > 0 {
            warn!(
                dropped_unknown_barber = report.dropped_unknown_barber,
                dropped_invalid = report.dropped_invalid,
                demoted = report.demoted,
                "Saved queue state was repaired on load"
            );
        }
        info!(restored = report.restored, "Queue state loaded");
        Ok(())
    }

    /// Apply one change against the latest saved state and save it
    ///
    /// Reloads, runs `apply`, then saves, all under the state lock. Nothing
    /// is saved when `apply` fails.
    pub async fn transact<T>(&self, apply: impl FnOnce(&QueueService) -> Result<T>) -> Result<T> {
        let _lock = match &self.lock_path {
            Some(path) => Some(StateLock::acquire(path.clone()).await?),
            None => None,
        };

        self.reload().await?;
        let value = apply(&self.queue)?;
        self.commit().await?;
        Ok(value)
    }

    async fn commit(&self) -> Result<()> {
        let snapshot = self.queue.snapshot().context("Failed to snapshot queue")?;
        self.store
            .save(&snapshot)
            .await
            .context("Failed to save queue state")
    }
}
