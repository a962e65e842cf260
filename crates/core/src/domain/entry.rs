// Queue Entry Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Barber identifier (roster key)
pub type BarberId = u32;

/// Service identifier (catalog key, e.g. "haircut")
pub type ServiceId = String;

/// Queue entry identifier
///
/// Issued by an [`crate::port::IdProvider`] in strictly increasing order and
/// never reused. Display truncation ("#0042") is a presentation concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entry status
///
/// `Waiting -> InService -> Done`. Done entries are never stored; they only
/// leave the queue as the return value of a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Waiting,
    InService,
    Done,
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Waiting => write!(f, "WAITING"),
            EntryStatus::InService => write!(f, "IN_SERVICE"),
            EntryStatus::Done => write!(f, "DONE"),
        }
    }
}

/// A single client's request waiting for a specific barber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: EntryId,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub barber_id: BarberId,
    pub service_id: ServiceId,

    pub joined_at: i64, // epoch ms
    #[serde(default)]
    pub started_at: Option<i64>,

    pub status: EntryStatus,

    // Notification delivery lives outside this crate; the flag is carried for it
    #[serde(default)]
    pub notified: bool,
}

impl QueueEntry {
    /// Create a new waiting entry
    ///
    /// # Arguments
    ///
    /// * `id` - Unique entry ID (injected, not generated)
    /// * `joined_at` - Join timestamp in epoch ms (injected, not system time)
    /// * `client_name` - Client display name
    /// * `client_phone` - Optional phone number
    /// * `barber_id` - Barber whose lane the entry joins
    /// * `service_id` - Requested service
    pub fn new(
        id: EntryId,
        joined_at: i64,
        client_name: impl Into<String>,
        client_phone: Option<String>,
        barber_id: BarberId,
        service_id: impl Into<ServiceId>,
    ) -> Self {
        Self {
            id,
            client_name: client_name.into(),
            client_phone,
            barber_id,
            service_id: service_id.into(),
            joined_at,
            started_at: None,
            status: EntryStatus::Waiting,
            notified: false,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.status == EntryStatus::Waiting
    }

    pub fn is_in_service(&self) -> bool {
        self.status == EntryStatus::InService
    }

    /// Transition Waiting -> InService with explicit timestamp
    pub fn start(&mut self, now_millis: i64) -> Result<()> {
        if self.status != EntryStatus::Waiting {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: EntryStatus::InService.to_string(),
            });
        }
        self.status = EntryStatus::InService;
        self.started_at = Some(now_millis);
        Ok(())
    }

    /// Transition InService -> Done
    pub fn complete(&mut self) -> Result<()> {
        if self.status != EntryStatus::InService {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: EntryStatus::Done.to_string(),
            });
        }
        self.status = EntryStatus::Done;
        Ok(())
    }
}
