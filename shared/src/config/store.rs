//! Refresh token store configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Lowest accepted write-attempt budget: one write plus at least one retry
pub const MIN_WRITE_ATTEMPTS: u32 = 2;

/// Persistence backend for client records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// MySQL via SQLx
    #[default]
    Mysql,
    /// Process-local map, lost on restart
    Memory,
}

/// Refresh token store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Which repository implementation backs the store
    #[serde(default)]
    pub backend: StoreBackend,

    /// Attempts per mutating operation when a write loses a concurrency race
    #[serde(default = "default_max_write_attempts")]
    pub max_write_attempts: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            max_write_attempts: default_max_write_attempts(),
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_write_attempts < MIN_WRITE_ATTEMPTS {
            return Err(ConfigError::Invalid {
                message: format!(
                    "store.max_write_attempts must be at least {}",
                    MIN_WRITE_ATTEMPTS
                ),
            });
        }
        Ok(())
    }
}

fn default_max_write_attempts() -> u32 {
    3
}
