//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Shape violations caught before anything reaches the store.
///
/// Referential and uniqueness checks need the store and are reported by the
/// handlers instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A required field is empty or malformed
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// Amount is NaN or infinite
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl DomainError {
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}
