// Queue Snapshot (persistence hand-off format)

use super::entry::{BarberId, QueueEntry};
use serde::{Deserialize, Serialize};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Persisted active flag for a roster member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarberState {
    pub id: BarberId,
    pub active: bool,
}

/// Serializable copy of the whole queue
///
/// `last_issued_id` is the id sequence high-water mark, so ids of entries
/// already completed are not handed out again after a restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub version: u32,
    pub saved_at: i64, // epoch ms
    pub last_issued_id: u64,
    #[serde(default)]
    pub barbers: Vec<BarberState>,
    #[serde(default)]
    pub entries: Vec<QueueEntry>,
}

impl QueueSnapshot {
    pub fn empty(saved_at: i64) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at,
            last_issued_id: 0,
            barbers: Vec::new(),
            entries: Vec::new(),
        }
    }
}
