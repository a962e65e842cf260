// Shared test fixtures for the queue store

use super::QueueService;
use crate::domain::{Barber, BarberRoster, QueueEntry, Service, ServiceCatalog};
use crate::port::SequentialIdProvider;
use std::sync::Arc;

pub use crate::port::time_provider::mocks::MockTimeProvider;

pub fn catalog() -> ServiceCatalog {
    ServiceCatalog::new(vec![
        Service::new("haircut", "Haircut", 30, 45),
        Service::new("shave", "Shave", 10, 20),
    ])
    .unwrap()
}

/// Barber 1 (B1) active, barber 2 (B2) inactive
pub fn roster() -> BarberRoster {
    BarberRoster::new(vec![Barber::new(1, "B1", true), Barber::new(2, "B2", false)]).unwrap()
}

pub fn shop() -> (QueueService, Arc<MockTimeProvider>) {
    let clock = Arc::new(MockTimeProvider::new(1_000));
    let service = QueueService::new(
        catalog(),
        roster(),
        Arc::new(SequentialIdProvider::new()),
        clock.clone(),
    );
    (service, clock)
}

pub fn assert_sorted(lane: &[QueueEntry]) {
    for pair in lane.windows(2) {
        assert!(
            pair[0].joined_at <= pair[1].joined_at,
            "lane out of order: {} joined at {} before {} at {}",
            pair[0].id,
            pair[0].joined_at,
            pair[1].id,
            pair[1].joined_at
        );
        assert!(pair[0].id < pair[1].id);
    }
}
