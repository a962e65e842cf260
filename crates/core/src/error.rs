// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// Queue operations report [`crate::domain::DomainError`] directly; this type
/// wraps it together with the failures adapters and configuration can raise.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
