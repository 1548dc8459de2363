//! # Refresh Keeper Core
//!
//! Core business logic and domain layer for the Refresh Keeper backend.
//! This crate contains the client record entity, the refresh token store,
//! the access token service, repository interfaces and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
