// Snapshot & Restore - hand-off between the queue store and a SnapshotStore

use super::{poisoned, QueueService};
use crate::domain::error::{DomainError, Result};
use crate::domain::{BarberId, BarberState, EntryStatus, QueueEntry, QueueSnapshot, SNAPSHOT_VERSION};
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};

/// What a restore kept, dropped and repaired
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub restored: usize,
    /// Entries for barbers no longer on the roster
    pub dropped_unknown_barber: usize,
    /// Entries whose id was already restored, or stored as Done
    pub dropped_invalid: usize,
    /// In-service entries behind the head of line, put back to waiting
    pub demoted: usize,
    /// Kept entries whose service is missing (estimated with the default duration)
    pub unknown_service: usize,
}

impl QueueService {
    /// Copy the whole queue
    ///
    /// The roster and every lane are locked together so the copy is
    /// consistent across barbers.
    pub fn snapshot(&self) -> Result<QueueSnapshot> {
        let roster = self.read_roster()?;
        let mut lanes = Vec::with_capacity(self.lanes.len());
        for lane in self.lanes.values() {
            lanes.push(lane.lock().map_err(poisoned)?);
        }

        let mut snapshot = QueueSnapshot::empty(self.time_provider.now_millis());
        snapshot.last_issued_id = self.id_provider.high_water();
        snapshot.barbers = roster
            .iter()
            .map(|b| BarberState {
                id: b.id,
                active: b.active,
            })
            .collect();
        snapshot.entries = lanes
            .iter()
            .flat_map(|lane| lane.entries().iter().cloned())
            .collect();

        Ok(snapshot)
    }

    /// Replace the queue contents with a snapshot
    ///
    /// Repairs rather than rejects: entries for unknown barbers or with a
    /// duplicate id are dropped, lanes are re-sorted by join time, and only a
    /// lane's head may stay in service. The id sequence resumes past every id
    /// the snapshot has seen.
    ///
    /// # Errors
    /// - `DomainError::Validation` for a snapshot from a newer format version;
    ///   the queue is left untouched
    pub fn restore(&self, snapshot: QueueSnapshot) -> Result<RestoreReport> {
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(DomainError::Validation(format!(
                "unsupported snapshot version {} (max {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }

        let mut report = RestoreReport::default();
        let highest_entry_id = snapshot
            .entries
            .iter()
            .map(|e| e.id.value())
            .max()
            .unwrap_or(0);

        let mut grouped: BTreeMap<BarberId, Vec<QueueEntry>> = BTreeMap::new();
        let mut seen = HashSet::new();
        for entry in snapshot.entries {
            if !self.lanes.contains_key(&entry.barber_id) {
                warn!(entry_id = %entry.id, barber_id = entry.barber_id, "Dropping entry for unknown barber");
                report.dropped_unknown_barber += 1;
                continue;
            }
            if entry.status == EntryStatus::Done || !seen.insert(entry.id) {
                warn!(entry_id = %entry.id, status = %entry.status, "Dropping invalid entry");
                report.dropped_invalid += 1;
                continue;
            }
            if !self.catalog.contains(&entry.service_id) {
                warn!(entry_id = %entry.id, service_id = %entry.service_id, "Entry references unknown service");
                report.unknown_service += 1;
            }
            grouped.entry(entry.barber_id).or_default().push(entry);
        }

        for entries in grouped.values_mut() {
            entries.sort_by_key(|e| (e.joined_at, e.id));
            for entry in entries.iter_mut().skip(1) {
                if entry.status == EntryStatus::InService {
                    warn!(entry_id = %entry.id, "Demoting in-service entry behind head of line");
                    entry.status = EntryStatus::Waiting;
                    entry.started_at = None;
                    report.demoted += 1;
                }
            }
        }

        let mut roster = self.write_roster()?;
        let mut lanes = Vec::with_capacity(self.lanes.len());
        for (barber_id, lane) in &self.lanes {
            lanes.push((*barber_id, lane.lock().map_err(poisoned)?));
        }

        for state in &snapshot.barbers {
            if !roster.set_active(state.id, state.active) {
                warn!(barber_id = state.id, "Ignoring state for unknown barber");
            }
        }

        for (barber_id, lane) in lanes.iter_mut() {
            let barber_id = *barber_id;
            lane.clear();
            for entry in grouped.remove(&barber_id).unwrap_or_default() {
                lane.push(entry);
                report.restored += 1;
            }
        }

        self.id_provider
            .resume_after(snapshot.last_issued_id.max(highest_entry_id));

        info!(
            restored = report.restored,
            dropped = report.dropped_unknown_barber + report.dropped_invalid,
            demoted = report.demoted,
            "Queue restored from snapshot"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{assert_sorted, shop};
    use super::super::EnqueueRequest;
    use super::*;
    use crate::domain::EntryId;

    fn entry(id: u64, barber_id: BarberId, joined_at: i64) -> QueueEntry {
        QueueEntry::new(EntryId::new(id), joined_at, format!("c{}", id), None, barber_id, "haircut")
    }

    #[test]
    fn test_snapshot_round_trip() {
        let (source, _) = shop();
        let amy = source.enqueue(EnqueueRequest::new("Amy", 1, "haircut")).unwrap();
        source.enqueue(EnqueueRequest::new("Ben", 1, "shave")).unwrap();
        source.start_service(1).unwrap();
        source.set_barber_active(2, true).unwrap();
        source.enqueue(EnqueueRequest::new("Cal", 2, "shave")).unwrap();
        source.dequeue_completed(EntryId::new(3)).unwrap();

        let snapshot = source.snapshot().unwrap();
        assert_eq!(snapshot.last_issued_id, 3);
        assert_eq!(snapshot.entries.len(), 2);

        let (target, _) = shop();
        let report = target.restore(snapshot).unwrap();

        assert_eq!(report.restored, 2);
        assert_eq!(target.list_for_barber(1).unwrap(), source.list_for_barber(1).unwrap());
        assert_eq!(target.current_client(1).unwrap().unwrap().id, amy.id);
        assert!(target.barber(2).unwrap().unwrap().active);

        // Completed id 3 is never handed out again
        let next = target.enqueue(EnqueueRequest::new("Dee", 1, "shave")).unwrap();
        assert_eq!(next.id, EntryId::new(4));
    }

    #[test]
    fn test_restore_repairs_inconsistent_state() {
        let (service, _) = shop();

        let mut late_in_service = entry(2, 1, 9_000);
        late_in_service.start(9_500).unwrap();
        let mut done = entry(6, 1, 1_000);
        done.start(1_100).unwrap();
        done.complete().unwrap();
        let mut unknown_service = entry(7, 1, 8_000);
        unknown_service.service_id = "discontinued".to_string();

        let mut snapshot = QueueSnapshot::empty(10_000);
        snapshot.entries = vec![
            late_in_service,
            entry(3, 1, 2_000),
            entry(3, 1, 2_500), // duplicate id
            entry(4, 9, 3_000), // unknown barber
            done,
            unknown_service,
        ];

        let report = service.restore(snapshot).unwrap();

        assert_eq!(
            report,
            RestoreReport {
                restored: 3,
                dropped_unknown_barber: 1,
                dropped_invalid: 2,
                demoted: 1,
                unknown_service: 1,
            }
        );

        let lane = service.list_for_barber(1).unwrap();
        assert_sorted(&lane);
        let ids: Vec<u64> = lane.iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![3, 7, 2]);
        assert!(lane.iter().all(|e| e.status == EntryStatus::Waiting));

        // Unknown service contributes the default 30 minutes
        assert_eq!(service.estimate_wait(1, 2).unwrap(), 60);

        // Sequence resumes past the highest id in the snapshot, even a dropped one
        let next = service.enqueue(EnqueueRequest::new("Eve", 1, "shave")).unwrap();
        assert_eq!(next.id, EntryId::new(8));
    }

    #[test]
    fn test_restore_rejects_newer_version() {
        let (service, _) = shop();
        service.enqueue(EnqueueRequest::new("Amy", 1, "haircut")).unwrap();

        let mut snapshot = QueueSnapshot::empty(0);
        snapshot.version = SNAPSHOT_VERSION + 1;

        assert!(matches!(
            service.restore(snapshot).unwrap_err(),
            DomainError::Validation(_)
        ));
        assert_eq!(service.total_queued().unwrap(), 1);
    }

    #[test]
    fn test_restore_replaces_existing_contents() {
        let (service, _) = shop();
        service.enqueue(EnqueueRequest::new("Amy", 1, "haircut")).unwrap();

        let report = service.restore(QueueSnapshot::empty(0)).unwrap();

        assert_eq!(report.restored, 0);
        assert_eq!(service.total_queued().unwrap(), 0);
    }
}
