//! Error types for scheduling, deck storage and configuration.

use thiserror::Error;

use crate::models::CardId;

/// Errors raised by the SM-2 scheduler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Quality rating outside the 0-5 scale. This is a caller bug.
    #[error("invalid quality rating {0}: expected a value between 0 and 5")]
    InvalidQuality(i64),
}

/// Errors raised by the deck store.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("deck not found: {0}")]
    DeckNotFound(String),

    #[error("deck already exists: {0}")]
    DeckAlreadyExists(String),

    #[error("card not found: {0}")]
    CardNotFound(CardId),

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Errors raised while loading scheduler configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl StoreError {
    /// Returns true if the error comes from an out-of-range quality rating.
    pub fn is_invalid_quality(&self) -> bool {
        matches!(self, StoreError::Scheduler(SchedulerError::InvalidQuality(_)))
    }
}
