//! Domain-specific error types and error handling.

mod types;


// Re-export all error types and utilities
pub use types::{AuthError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
///
/// `Auth`, `Token` and `ValidationErr` carry expected, user-facing failures.
/// `Internal` is reserved for infrastructure faults (store unreachable,
/// corrupt rows) and is the only variant callers should treat as fatal.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Whether this error is an infrastructure fault rather than an expected
    /// business outcome
    pub fn is_internal(&self) -> bool {
        matches!(self, DomainError::Internal { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
