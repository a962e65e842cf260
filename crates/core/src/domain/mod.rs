// Domain Layer - Pure business logic and entities

pub mod catalog;
pub mod entry;
pub mod error;
pub mod queue;
pub mod shop;
pub mod snapshot;

// Re-exports
pub use catalog::{Barber, BarberRoster, Service, ServiceCatalog};
pub use entry::{BarberId, EntryId, EntryStatus, QueueEntry, ServiceId};
pub use error::DomainError;
pub use queue::Lane;
pub use shop::ShopConfig;
pub use snapshot::{BarberState, QueueSnapshot, SNAPSHOT_VERSION};
