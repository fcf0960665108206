//! Error types for the Citizen Agent core.

use thiserror::Error;

/// Validation errors for caller-supplied input.
///
/// These are presence checks only: a field that is required but missing
/// or empty, or a request parameter that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("{0} must be a non-empty list")]
    EmptyList(&'static str),

    #[error("invalid {name} parameter: {value:?}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("{name} must be between 1 and {max}, got {got}")]
    OutOfRange {
        name: &'static str,
        max: u32,
        got: u64,
    },

    #[error("unknown consent status: {0:?}")]
    UnknownStatus(String),
}
