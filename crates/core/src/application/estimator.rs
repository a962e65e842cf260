//! Wait Estimator - queue position and predicted wait, computed on demand
//!
//! Pure functions over a snapshot of queue entries and the service catalog.
//! Nothing is cached: every read recomputes from the entries it is given, so
//! an estimate can never be stale with respect to the snapshot.

use crate::domain::{BarberId, QueueEntry, ServiceCatalog};
use serde::{Deserialize, Serialize};

/// Duration assumed for an entry whose service is missing from the catalog
pub const DEFAULT_SERVICE_MINUTES: u32 = 30;

/// Position and predicted wait for one entry (or a prospective client)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitEstimate {
    /// Number of entries ahead
    pub position: usize,
    pub minutes: u32,
}

/// Service duration of an entry, falling back to [`DEFAULT_SERVICE_MINUTES`]
pub fn entry_minutes(entry: &QueueEntry, catalog: &ServiceCatalog) -> u32 {
    catalog
        .duration_of(&entry.service_id)
        .unwrap_or(DEFAULT_SERVICE_MINUTES)
}

/// Number of entries queued for a barber
///
/// Used as the position a client joining now would get.
pub fn position_of(barber_id: BarberId, queue: &[QueueEntry]) -> usize {
    queue.iter().filter(|e| e.barber_id == barber_id).count()
}

/// Sum of service durations of the `position` entries ahead in a barber's lane
///
/// `queue` may hold entries for several barbers (only `barber_id`'s entries
/// count) and must be in join order. Positions past the end of the lane
/// count every queued entry. Returns 0 for position 0. Saturates at
/// `u32::MAX` instead of overflowing.
pub fn estimated_wait_minutes(
    position: usize,
    barber_id: BarberId,
    queue: &[QueueEntry],
    catalog: &ServiceCatalog,
) -> u32 {
    queue
        .iter()
        .filter(|e| e.barber_id == barber_id)
        .take(position)
        .map(|e| entry_minutes(e, catalog))
        .fold(0u32, u32::saturating_add)
}

/// Wait estimate for every position of a lane in one pass
///
/// Element `i` equals `estimated_wait_minutes(i, ..)` for the lane's barber.
pub fn wait_profile(lane: &[QueueEntry], catalog: &ServiceCatalog) -> Vec<u32> {
    let mut ahead = 0u32;
    lane.iter()
        .map(|entry| {
            let wait = ahead;
            ahead = ahead.saturating_add(entry_minutes(entry, catalog));
            wait
        })
        .collect()
}
