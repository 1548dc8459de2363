//! Access token service implementation

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::domain::entities::token::{AccessToken, Claims};
use crate::errors::{DomainError, TokenError};

use super::config::AccessTokenConfig;

/// Signs and verifies JWT access tokens
pub struct AccessTokenService {
    config: AccessTokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AccessTokenService {
    /// Creates a new access token service
    ///
    /// # Returns
    ///
    /// A new `AccessTokenService` or a validation error if the configuration
    /// cannot produce usable tokens
    pub fn new(config: AccessTokenConfig) -> Result<Self, DomainError> {
        if config.jwt_secret.is_empty() {
            return Err(DomainError::Validation {
                message: "JWT secret must not be empty".to_string(),
            });
        }
        if config.expiry_seconds <= 0 {
            return Err(DomainError::Validation {
                message: "Access token expiry must be positive".to_string(),
            });
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss", "aud"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = config.leeway;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Access token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.config.expiry_seconds
    }

    /// Mints a signed access token for `user_id`
    pub fn mint(&self, user_id: &str) -> Result<AccessToken, DomainError> {
        let claims = Claims::new_access_token(
            user_id,
            &self.config.issuer,
            &self.config.audience,
            Duration::seconds(self.config.expiry_seconds),
        );
        let token = self.encode_jwt(&claims)?;

        debug!(user_id, jti = %claims.jti, "Minted access token");
        Ok(AccessToken::bearer(token, self.config.expiry_seconds))
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies an access token and returns the claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(DomainError)` - `TokenExpired`, `TokenNotYetValid` or
    ///   `InvalidTokenFormat` for anything else (bad signature, wrong
    ///   issuer or audience, garbage input)
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                ErrorKind::ImmatureSignature => DomainError::Token(TokenError::TokenNotYetValid),
                _ => DomainError::Token(TokenError::InvalidTokenFormat),
            })?;

        Ok(token_data.claims)
    }
}
