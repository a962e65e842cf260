// ID Provider Port (for deterministic testing)

use crate::domain::EntryId;
use std::sync::atomic::{AtomicU64, Ordering};

/// ID provider interface (allows deterministic IDs in tests)
///
/// Ids must be strictly increasing and never reused for the lifetime of the
/// provider, including after `resume_after`.
pub trait IdProvider: Send + Sync {
    /// Generate a new unique entry ID
    fn next_id(&self) -> EntryId;

    /// Largest id issued so far (0 if none)
    fn high_water(&self) -> u64;

    /// Make every subsequent id strictly greater than `floor`
    fn resume_after(&self, floor: u64);
}

/// Atomic counter provider (production)
///
/// Ids start at 1.
#[derive(Debug, Default)]
pub struct SequentialIdProvider {
    last: AtomicU64,
}

impl SequentialIdProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a sequence whose first id is `last + 1`
    pub fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }
}

impl IdProvider for SequentialIdProvider {
    fn next_id(&self) -> EntryId {
        EntryId::new(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn high_water(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }

    fn resume_after(&self, floor: u64) {
        self.last.fetch_max(floor, Ordering::SeqCst);
    }
}
