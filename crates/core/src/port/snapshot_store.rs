// Snapshot Store Port (persistence collaborator)

use crate::domain::QueueSnapshot;
use crate::error::Result;
use async_trait::async_trait;

/// Persistence interface for the queue
///
/// Implementations decide where snapshots live. No durability guarantee is
/// implied beyond "a successful save is what the next load returns".
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist a snapshot, replacing any previous one
    async fn save(&self, snapshot: &QueueSnapshot) -> Result<()>;

    /// Load the last saved snapshot
    ///
    /// # Returns
    /// `None` when nothing has been saved yet
    async fn load(&self) -> Result<Option<QueueSnapshot>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    fn poisoned<T>(_: PoisonError<T>) -> AppError {
        AppError::Persistence("in-memory snapshot slot poisoned".to_string())
    }

    /// In-memory SnapshotStore for tests
    #[derive(Default, Clone)]
    pub struct InMemorySnapshotStore {
        slot: Arc<Mutex<Option<QueueSnapshot>>>,
        save_count: Arc<AtomicUsize>,
    }

    impl InMemorySnapshotStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn save_count(&self) -> usize {
            self.save_count.load(Ordering::SeqCst)
        }

        fn slot(&self) -> Result<MutexGuard<'_, Option<QueueSnapshot>>> {
            self.slot.lock().map_err(poisoned)
        }
    }

    #[async_trait]
    impl SnapshotStore for InMemorySnapshotStore {
        async fn save(&self, snapshot: &QueueSnapshot) -> Result<()> {
            *self.slot()? = Some(snapshot.clone());
            self.save_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn load(&self) -> Result<Option<QueueSnapshot>> {
            Ok(self.slot()?.clone())
        }
    }

}
