//! Error types for the refresh token store and access token handling
//!
//! HTTP status mapping and response bodies live in the presentation layer;
//! these enums only describe what went wrong.

use thiserror::Error;

/// Refresh token store errors
///
/// `NoSuchClient`, `TokenNotFound` and `PersistenceFailure` reach callers.
/// The two conflict variants are raised by repositories when a conditional
/// write loses a race and are retried inside the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No client record for user: {user_id}")]
    NoSuchClient { user_id: String },

    #[error("Refresh token not found")]
    TokenNotFound,

    #[error("Persistence failure: {message}")]
    PersistenceFailure { message: String },

    #[error("Client record for user {user_id} was created concurrently")]
    ConcurrentCreateConflict { user_id: String },

    #[error("Client record for user {user_id} was modified concurrently")]
    ConcurrentUpdateConflict { user_id: String },
}

impl StoreError {
    /// Shorthand for wrapping a backend error message
    pub fn persistence(message: impl Into<String>) -> Self {
        StoreError::PersistenceFailure {
            message: message.into(),
        }
    }

    /// Whether this error is a lost race that a fresh read-modify-write may fix
    pub fn is_write_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::ConcurrentCreateConflict { .. } | StoreError::ConcurrentUpdateConflict { .. }
        )
    }
}

/// Access token and token format errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}
