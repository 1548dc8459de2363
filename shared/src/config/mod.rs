//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Access token (JWT) signing configuration
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server and CORS configuration
//! - `store` - Refresh token store backend and write-retry policy
//!
//! Values are layered: built-in defaults, then an optional
//! `config.<environment>.toml` file, then `RK__`-prefixed environment
//! variables (for example `RK__DATABASE__URL` or `RK__SERVER__PORT`).

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;
pub mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::JwtConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};
pub use store::{StoreBackend, StoreConfig};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "RK";

/// Separator between prefix and nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

/// Errors raised while assembling the application configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Access token configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Refresh token store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Defaults for a given environment, before any file or env overrides
    pub fn for_environment(env: Environment) -> Self {
        Self {
            environment: env,
            cors: CorsConfig::for_environment(env),
            logging: LoggingConfig::for_environment(env),
            ..Default::default()
        }
    }

    /// Load configuration from `.env`, the environment's TOML file and
    /// `RK__` environment variables, in that order of precedence (lowest first).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let env = Environment::from_env();
        let defaults = config::Config::try_from(&Self::for_environment(env))?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(env.config_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        let mut loaded: Self = settings.try_deserialize()?;
        loaded.environment = env;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject configurations that are unsafe to run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.is_production() && self.jwt.is_using_default_secret() {
            return Err(ConfigError::Invalid {
                message: "jwt.secret must be set in production".to_string(),
            });
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err(ConfigError::Invalid {
                message: "jwt.access_token_expiry must be positive".to_string(),
            });
        }
        self.store.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.store.backend, StoreBackend::Mysql);
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let config = AppConfig::for_environment(Environment::Production);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("jwt.secret"));
    }

    #[test]
    fn test_production_accepts_custom_secret() {
        let mut config = AppConfig::for_environment(Environment::Production);
        config.jwt = JwtConfig::new("a-real-secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_access_expiry() {
        let mut config = AppConfig::default();
        config.jwt.access_token_expiry = 0;
        assert!(config.validate().is_err());
    }
}
