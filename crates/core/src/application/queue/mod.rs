// Queue Store - per-barber lanes with atomic read-modify-write

pub mod board;
pub mod enqueue;
pub mod restore;

#[cfg(test)]
pub(crate) mod fixtures;

pub use board::{BarberBoard, BoardRow};
pub use enqueue::EnqueueRequest;
pub use restore::RestoreReport;

use crate::application::estimator::{self, WaitEstimate};
use crate::domain::error::{DomainError, Result};
use crate::domain::{Barber, BarberId, BarberRoster, EntryId, EntryStatus, Lane, QueueEntry, ServiceCatalog};
use crate::port::{IdProvider, TimeProvider};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

pub(crate) fn poisoned<T>(_: PoisonError<T>) -> DomainError {
    DomainError::Internal("queue lock poisoned".to_string())
}

/// Queue Store
///
/// Holds one [`Lane`] per roster member. Each lane has its own lock, so a
/// command reads and mutates a barber's queue atomically while other barbers
/// proceed independently. Roster flags sit behind a separate `RwLock`; when
/// both are needed the roster is locked first.
///
/// Constructed once per session; `reset` and `restore` replace the lanes'
/// contents without rebuilding the service.
pub struct QueueService {
    catalog: ServiceCatalog,
    roster: RwLock<BarberRoster>,
    lanes: BTreeMap<BarberId, Mutex<Lane>>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl QueueService {
    pub fn new(
        catalog: ServiceCatalog,
        roster: BarberRoster,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        let lanes = roster
            .iter()
            .map(|b| (b.id, Mutex::new(Lane::new(b.id))))
            .collect();

        Self {
            catalog,
            roster: RwLock::new(roster),
            lanes,
            id_provider,
            time_provider,
        }
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    fn read_roster(&self) -> Result<RwLockReadGuard<'_, BarberRoster>> {
        self.roster.read().map_err(poisoned)
    }

    fn write_roster(&self) -> Result<RwLockWriteGuard<'_, BarberRoster>> {
        self.roster.write().map_err(poisoned)
    }

    /// Lock a barber's lane. `None` if the barber is not on the roster.
    fn lock_lane(&self, barber_id: BarberId) -> Result<Option<MutexGuard<'_, Lane>>> {
        match self.lanes.get(&barber_id) {
            Some(lane) => lane.lock().map(Some).map_err(poisoned),
            None => Ok(None),
        }
    }

    /// Find the lane holding an entry and run `f` on it while locked
    ///
    /// Entries never move between lanes, so locking lanes one at a time
    /// cannot miss an entry that exists for the whole call.
    fn with_entry_lane<T>(
        &self,
        entry_id: EntryId,
        f: impl FnOnce(&mut Lane, usize) -> Result<T>,
    ) -> Result<T> {
        for lane in self.lanes.values() {
            let mut lane = lane.lock().map_err(poisoned)?;
            if let Some(index) = lane.position_of(entry_id) {
                return f(&mut *lane, index);
            }
        }
        Err(DomainError::EntryNotFound(entry_id))
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Join a barber's queue
    ///
    /// Appends a new waiting entry with a fresh id and the current time.
    ///
    /// # Errors
    /// - `DomainError::Validation` if the name is empty or the barber/service
    ///   cannot be used; nothing is changed in that case
    pub fn enqueue(&self, req: EnqueueRequest) -> Result<QueueEntry> {
        // Held across the lane mutation so the barber cannot go inactive mid-join
        let roster = self.read_roster()?;
        let req = enqueue::validate_request(req, &self.catalog, &roster)?;

        let mut lane = self.lock_lane(req.barber_id)?.ok_or_else(|| {
            DomainError::Internal(format!("no lane for barber {}", req.barber_id))
        })?;

        let entry = QueueEntry::new(
            self.id_provider.next_id(),
            self.time_provider.now_millis(),
            req.client_name,
            req.client_phone,
            req.barber_id,
            req.service_id,
        );
        let entry = lane.push(entry).clone();

        info!(
            entry_id = %entry.id,
            barber_id = entry.barber_id,
            service_id = %entry.service_id,
            position = lane.len() - 1,
            "Client joined queue"
        );

        Ok(entry)
    }

    /// Complete a service and remove the entry permanently
    ///
    /// The entry is returned with status `Done`. A waiting entry passes
    /// through `InService` first (completed without an explicit start).
    ///
    /// # Errors
    /// - `DomainError::EntryNotFound` if no lane holds the id, including a
    ///   second completion of the same entry
    pub fn dequeue_completed(&self, entry_id: EntryId) -> Result<QueueEntry> {
        let now = self.time_provider.now_millis();

        self.with_entry_lane(entry_id, |lane, index| {
            let mut done = lane.entries()[index].clone();
            if done.is_waiting() {
                done.start(now)?;
            }
            done.complete()?;
            lane.remove(entry_id);

            info!(
                entry_id = %entry_id,
                barber_id = done.barber_id,
                remaining = lane.len(),
                "Service completed"
            );
            Ok(done)
        })
    }

    /// Mark the head of a barber's line as in service
    ///
    /// # Errors
    /// - `DomainError::Validation` for an unknown barber
    /// - `DomainError::QueueEmpty` if nobody is queued
    /// - `DomainError::InvalidStateTransition` if the head is already in service
    pub fn start_service(&self, barber_id: BarberId) -> Result<QueueEntry> {
        let now = self.time_provider.now_millis();
        let mut lane = self
            .lock_lane(barber_id)?
            .ok_or_else(|| DomainError::Validation(format!("unknown barber {}", barber_id)))?;

        let head = lane.head_mut().ok_or(DomainError::QueueEmpty(barber_id))?;
        head.start(now)?;

        info!(entry_id = %head.id, barber_id = barber_id, "Service started");
        Ok(head.clone())
    }

    /// Remove a waiting entry (client left before being served)
    ///
    /// # Errors
    /// - `DomainError::EntryNotFound` if absent
    /// - `DomainError::InvalidStateTransition` if the entry is in service
    pub fn cancel(&self, entry_id: EntryId) -> Result<QueueEntry> {
        self.with_entry_lane(entry_id, |lane, index| {
            let entry = &lane.entries()[index];
            if !entry.is_waiting() {
                return Err(DomainError::InvalidStateTransition {
                    from: entry.status.to_string(),
                    to: "CANCELLED".to_string(),
                });
            }

            let removed = lane.remove(entry_id).ok_or(DomainError::EntryNotFound(entry_id))?;
            info!(entry_id = %entry_id, barber_id = removed.barber_id, "Client left queue");
            Ok(removed)
        })
    }

    /// Open or close a barber for new clients
    ///
    /// Closing keeps the existing lane; queued clients are still served.
    pub fn set_barber_active(&self, barber_id: BarberId, active: bool) -> Result<()> {
        let mut roster = self.write_roster()?;
        if !roster.set_active(barber_id, active) {
            return Err(DomainError::Validation(format!("unknown barber {}", barber_id)));
        }
        info!(barber_id = barber_id, active = active, "Barber availability changed");
        Ok(())
    }

    /// Clear every lane (session teardown). The id sequence continues.
    pub fn reset(&self) -> Result<usize> {
        let mut removed = 0;
        for lane in self.lanes.values() {
            removed += lane.lock().map_err(poisoned)?.clear();
        }
        info!(removed = removed, "Queue reset");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Read models (owned snapshots, never mutate)
    // ------------------------------------------------------------------

    pub fn barbers(&self) -> Result<Vec<Barber>> {
        Ok(self.read_roster()?.iter().cloned().collect())
    }

    pub fn barber(&self, barber_id: BarberId) -> Result<Option<Barber>> {
        Ok(self.read_roster()?.get(barber_id).cloned())
    }

    pub fn active_barbers(&self) -> Result<usize> {
        Ok(self.read_roster()?.active_count())
    }

    /// A barber's queue in join order; empty for unknown barbers
    pub fn list_for_barber(&self, barber_id: BarberId) -> Result<Vec<QueueEntry>> {
        Ok(self
            .lock_lane(barber_id)?
            .map(|lane| lane.entries().to_vec())
            .unwrap_or_default())
    }

    /// Head of line: the in-service entry, else the earliest waiting one
    pub fn current_client(&self, barber_id: BarberId) -> Result<Option<QueueEntry>> {
        Ok(self
            .lock_lane(barber_id)?
            .and_then(|lane| lane.head().cloned()))
    }

    pub fn find_entry(&self, entry_id: EntryId) -> Result<Option<QueueEntry>> {
        match self.with_entry_lane(entry_id, |lane, index| Ok(lane.entries()[index].clone())) {
            Ok(entry) => Ok(Some(entry)),
            Err(DomainError::EntryNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Number of clients queued for a barber (position of the next joiner)
    pub fn position_of(&self, barber_id: BarberId) -> Result<usize> {
        Ok(self.lock_lane(barber_id)?.map(|lane| lane.len()).unwrap_or(0))
    }

    /// Estimated wait for `position` in a barber's queue, from live state
    pub fn estimate_wait(&self, barber_id: BarberId, position: usize) -> Result<u32> {
        Ok(match self.lock_lane(barber_id)? {
            Some(lane) => {
                estimator::estimated_wait_minutes(position, barber_id, lane.entries(), &self.catalog)
            }
            None => 0,
        })
    }

    /// Position and wait a client joining a barber's queue now would get
    pub fn preview(&self, barber_id: BarberId) -> Result<WaitEstimate> {
        let Some(lane) = self.lock_lane(barber_id)? else {
            return Ok(WaitEstimate { position: 0, minutes: 0 });
        };
        let position = lane.len();
        let minutes =
            estimator::estimated_wait_minutes(position, barber_id, lane.entries(), &self.catalog);
        Ok(WaitEstimate { position, minutes })
    }

    /// Position and wait of a queued entry
    ///
    /// # Errors
    /// - `DomainError::EntryNotFound` if absent
    pub fn wait_for_entry(&self, entry_id: EntryId) -> Result<WaitEstimate> {
        self.with_entry_lane(entry_id, |lane, index| {
            let minutes = estimator::estimated_wait_minutes(
                index,
                lane.barber_id(),
                lane.entries(),
                &self.catalog,
            );
            debug!(entry_id = %entry_id, position = index, minutes = minutes, "Wait estimated");
            Ok(WaitEstimate {
                position: index,
                minutes,
            })
        })
    }

    /// Total clients across all lanes
    pub fn total_queued(&self) -> Result<usize> {
        let mut total = 0;
        for lane in self.lanes.values() {
            total += lane.lock().map_err(poisoned)?.len();
        }
        Ok(total)
    }

    /// Clients currently being served across all lanes
    pub fn total_in_service(&self) -> Result<usize> {
        let mut total = 0;
        for lane in self.lanes.values() {
            let lane = lane.lock().map_err(poisoned)?;
            total += lane
                .entries()
                .iter()
                .filter(|e| e.status == EntryStatus::InService)
                .count();
        }
        Ok(total)
    }
}
