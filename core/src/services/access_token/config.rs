//! Configuration for the access token service

use jsonwebtoken::Algorithm;
use rk_shared::config::JwtConfig;

/// Configuration for the access token service
#[derive(Debug, Clone)]
pub struct AccessTokenConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm
    pub algorithm: Algorithm,
    /// Access token lifetime in seconds
    pub expiry_seconds: i64,
    /// `iss` claim written and required
    pub issuer: String,
    /// `aud` claim written and required
    pub audience: String,
    /// Clock skew tolerated on `exp`/`nbf`, in seconds
    pub leeway: u64,
}

impl Default for AccessTokenConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for AccessTokenConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            algorithm: Algorithm::HS256,
            expiry_seconds: config.access_token_expiry,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            leeway: config.leeway,
        }
    }
}
