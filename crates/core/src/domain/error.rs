// Domain Error Types

use super::entry::{BarberId, EntryId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Queue entry not found: {0}")]
    EntryNotFound(EntryId),

    #[error("No clients queued for barber {0}")]
    QueueEmpty(BarberId),

    #[error("Invalid entry state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
