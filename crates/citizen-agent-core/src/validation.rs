//! Presence checks for caller-supplied input.
//!
//! Nothing here checks formats or cross-field consistency; a field is
//! valid if it is there.

use crate::error::ValidationError;

/// Require a string field to be non-blank.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Require a list field to have at least one entry.
pub fn require_non_empty<T>(field: &'static str, values: &[T]) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::EmptyList(field));
    }
    Ok(())
}
