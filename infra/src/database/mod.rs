//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management and schema bootstrap
//! - The MySQL `ClientRepository` implementation

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlClientRepository;
