//! Error types for the Agent.

use citizen_agent_core::{ErrorCode, ValidationError};
use citizen_agent_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Bad request input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Consent identifier that matches nothing, including unparseable ones.
    #[error("consent not found: {0}")]
    ConsentNotFound(String),

    /// Notification identifier that matches nothing.
    #[error("notification not found: {0}")]
    NotificationNotFound(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Response could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AgentError {
    /// The envelope error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AgentError::Validation(_) => ErrorCode::BadRequest,
            AgentError::Store(StoreError::Validation(_)) => ErrorCode::BadRequest,
            AgentError::Store(e) if e.is_not_found() => ErrorCode::NotFound,
            AgentError::Store(_) => ErrorCode::InternalServerError,
            AgentError::ConsentNotFound(_) | AgentError::NotificationNotFound(_) => {
                ErrorCode::NotFound
            }
            AgentError::Config(_) | AgentError::Serialization(_) => {
                ErrorCode::InternalServerError
            }
        }
    }

    /// Human-readable message for the error envelope.
    ///
    /// Internal failures get a generic message; their details go to the log.
    pub fn public_message(&self) -> String {
        match self {
            AgentError::ConsentNotFound(_) | AgentError::Store(StoreError::ConsentNotFound(_)) => {
                "Consent not found".to_string()
            }
            AgentError::NotificationNotFound(_)
            | AgentError::Store(StoreError::NotificationNotFound(_)) => {
                "Notification not found".to_string()
            }
            AgentError::Validation(e) | AgentError::Store(StoreError::Validation(e)) => {
                e.to_string()
            }
            _ => "Something broke!".to_string(),
        }
    }
}

/// Result type for Agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
