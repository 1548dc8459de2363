//! Refresh token store
//!
//! This module owns the refresh token lifecycle for each user:
//! - Issuance with a per-user monotonically increasing counter
//! - Validation by exact match against the user's active tokens
//! - Revocation of a single token, or of every token for a user
//! - Per-user serialization and optimistic-write retry for all mutations

mod config;
mod locks;
mod service;

#[cfg(test)]
mod tests;

pub use config::RefreshTokenStoreConfig;
pub use locks::{UserLockGuard, UserLocks};
pub use service::RefreshTokenStore;
