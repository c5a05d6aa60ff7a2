//! Validation error shared by every payload in this crate

use thiserror::Error;

/// A payload or query parameter failed a schema constraint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// Human readable message, returned verbatim to API callers
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a missing or blank required field
    pub fn required(field: &'static str, label: &str) -> Self {
        Self::new(field, format!("{label} is required"))
    }
}

/// Reject a blank required string
pub(crate) fn require_text(value: &str, field: &'static str, label: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field, label));
    }
    Ok(())
}

/// Trim and drop blank entries from a list of free-text tags
pub(crate) fn clean_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
