//! Shared utilities and common types for the Refresh Keeper server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and layered loading
//! - Error response structures
//! - Tracing subscriber initialization

pub mod config;
pub mod errors;
pub mod logging;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig, LoggingConfig,
    ServerConfig, StoreBackend, StoreConfig,
};
pub use errors::{error_codes, ErrorResponse};
