//! Error types for the store module.

use citizen_agent_core::{ConsentId, NotificationId, ValidationError};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Required input missing on create or append.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Consent not found.
    #[error("consent not found: {0}")]
    ConsentNotFound(ConsentId),

    /// Notification not found.
    #[error("notification not found: {0}")]
    NotificationNotFound(NotificationId),

    /// A writer panicked while holding the collection lock.
    #[error("{0} collection lock poisoned")]
    LockPoisoned(&'static str),
}

impl StoreError {
    /// True for the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::ConsentNotFound(_) | StoreError::NotificationNotFound(_)
        )
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
