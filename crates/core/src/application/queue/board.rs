// Queue Board - per-barber read model for client and dashboard views

use super::{poisoned, QueueService};
use crate::application::estimator::{self, WaitEstimate};
use crate::domain::error::Result;
use crate::domain::{Barber, QueueEntry};
use serde::Serialize;

/// One queued client with its derived position and wait
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardRow {
    pub entry: QueueEntry,
    /// `None` when the entry's service is no longer in the catalog
    pub service_name: Option<String>,
    pub wait: WaitEstimate,
}

/// A barber's lane as shown on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarberBoard {
    pub barber: Barber,
    pub rows: Vec<BoardRow>,
    /// What a client joining this barber now would get
    pub next: WaitEstimate,
}

impl BarberBoard {
    /// Head of line
    pub fn current(&self) -> Option<&BoardRow> {
        self.rows.first()
    }

    /// Everyone behind the head of line
    pub fn upcoming(&self) -> &[BoardRow] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn queued(&self) -> usize {
        self.rows.len()
    }
}

impl QueueService {
    /// Board for every barber, in roster order
    ///
    /// Each lane is copied under its own lock, then estimated without holding
    /// any lock.
    pub fn board(&self) -> Result<Vec<BarberBoard>> {
        let barbers = self.barbers()?;
        let mut boards = Vec::with_capacity(barbers.len());

        for barber in barbers {
            let entries = match self.lanes.get(&barber.id) {
                Some(lane) => lane.lock().map_err(poisoned)?.entries().to_vec(),
                None => Vec::new(),
            };
            boards.push(self.barber_board(barber, entries));
        }

        Ok(boards)
    }

    fn barber_board(&self, barber: Barber, entries: Vec<QueueEntry>) -> BarberBoard {
        let catalog = self.catalog();
        let profile = estimator::wait_profile(&entries, catalog);

        let next = WaitEstimate {
            position: entries.len(),
            minutes: entries
                .last()
                .zip(profile.last())
                .map(|(last, wait)| wait.saturating_add(estimator::entry_minutes(last, catalog)))
                .unwrap_or(0),
        };

        let rows = entries
            .into_iter()
            .zip(profile)
            .enumerate()
            .map(|(position, (entry, minutes))| BoardRow {
                service_name: catalog.get(&entry.service_id).map(|s| s.name.clone()),
                entry,
                wait: WaitEstimate { position, minutes },
            })
            .collect();

        BarberBoard { barber, rows, next }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{roster, shop};
    use super::super::{EnqueueRequest, QueueService};
    use crate::domain::{Service, ServiceCatalog};
    use crate::port::{SequentialIdProvider, SystemTimeProvider};
    use std::sync::Arc;

    #[test]
    fn test_board_lists_every_barber_in_roster_order() {
        let (service, _) = shop();
        let board = service.board().unwrap();

        let ids: Vec<u32> = board.iter().map(|b| b.barber.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(board.iter().all(|b| b.rows.is_empty() && b.current().is_none()));
        assert_eq!(board[0].next.minutes, 0);
    }

    #[test]
    fn test_board_rows_carry_waits() {
        let (service, _) = shop();
        service.enqueue(EnqueueRequest::new("Amy", 1, "haircut")).unwrap();
        service.enqueue(EnqueueRequest::new("Ben", 1, "shave")).unwrap();
        service.enqueue(EnqueueRequest::new("Cal", 1, "haircut")).unwrap();

        let board = service.board().unwrap();
        let lane = &board[0];

        assert_eq!(lane.queued(), 3);
        assert_eq!(lane.current().unwrap().entry.client_name, "Amy");
        assert_eq!(lane.upcoming().len(), 2);

        let waits: Vec<u32> = lane.rows.iter().map(|r| r.wait.minutes).collect();
        assert_eq!(waits, vec![0, 30, 40]);
        assert_eq!(lane.rows[1].service_name.as_deref(), Some("Shave"));
        assert_eq!(lane.next.position, 3);
        assert_eq!(lane.next.minutes, 70);
        assert_eq!(lane.next.minutes, service.preview(1).unwrap().minutes);
    }

    #[test]
    fn test_next_wait_saturates_on_huge_durations() {
        let catalog =
            ServiceCatalog::new(vec![Service::new("marathon", "Marathon", u32::MAX / 2 + 1, 0)]).unwrap();
        let service = QueueService::new(
            catalog,
            roster(),
            Arc::new(SequentialIdProvider::new()),
            Arc::new(SystemTimeProvider),
        );
        service.enqueue(EnqueueRequest::new("Amy", 1, "marathon")).unwrap();
        service.enqueue(EnqueueRequest::new("Ben", 1, "marathon")).unwrap();

        let board = service.board().unwrap();
        let lane = &board[0];

        assert_eq!(lane.rows[1].wait.minutes, u32::MAX / 2 + 1);
        assert_eq!(lane.next.minutes, u32::MAX);
        assert_eq!(service.preview(1).unwrap().minutes, u32::MAX);
    }
}
