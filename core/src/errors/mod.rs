//! Domain-specific error types and error handling.

mod types;


// Re-export all error types
pub use types::{StoreError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Whether the error is a store write conflict eligible for retry
    pub fn is_write_conflict(&self) -> bool {
        matches!(self, DomainError::Store(e) if e.is_write_conflict())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
