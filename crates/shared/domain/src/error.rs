//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Password-related errors
    #[error("Password error: {0}")]
    Password(String),

    /// A unique field already belongs to another user
    #[error("User with {field} {value} already exists.")]
    Duplicate { field: &'static str, value: String },

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a password error
    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    /// Create a duplicate-value error for a unique field
    pub fn duplicate(field: &'static str, value: impl Into<String>) -> Self {
        DomainError::Duplicate {
            field,
            value: value.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
