//! Configuration for the refresh token store

use rk_shared::config::store::{StoreConfig, MIN_WRITE_ATTEMPTS};

/// Configuration for the refresh token store
#[derive(Debug, Clone)]
pub struct RefreshTokenStoreConfig {
    /// Read-modify-write attempts per mutation before giving up with
    /// `PersistenceFailure`. Never below two.
    pub max_write_attempts: u32,
}

impl Default for RefreshTokenStoreConfig {
    fn default() -> Self {
        Self {
            max_write_attempts: 3,
        }
    }
}

impl RefreshTokenStoreConfig {
    /// Attempt budget with the lower bound applied
    pub fn effective_write_attempts(&self) -> u32 {
        self.max_write_attempts.max(MIN_WRITE_ATTEMPTS)
    }
}

impl From<&StoreConfig> for RefreshTokenStoreConfig {
    fn from(config: &StoreConfig) -> Self {
        Self {
            max_write_attempts: config.max_write_attempts,
        }
    }
}
