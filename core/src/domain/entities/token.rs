//! Token entities: opaque refresh tokens and JWT access token claims.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::TokenError;

/// Bytes of CSPRNG output behind every refresh token
pub const REFRESH_TOKEN_RANDOM_BYTES: usize = 40;

/// Separator between the issuance counter and the random part
pub const REFRESH_TOKEN_SEPARATOR: char = '.';

/// Length of the hex-encoded random part
pub const REFRESH_TOKEN_SECRET_LEN: usize = REFRESH_TOKEN_RANDOM_BYTES * 2;

/// Opaque refresh token of the form `<counter>.<80 lowercase hex chars>`.
///
/// The counter prefix is the client's issuance counter at the time of issue.
/// It is a non-secret ordering aid; unforgeability comes from the random part.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RefreshToken {
    counter: u64,
    secret: String,
}

impl RefreshToken {
    /// Generates a fresh token for the given issuance counter using the OS RNG
    pub fn generate(counter: u64) -> Result<Self, TokenError> {
        let mut bytes = [0u8; REFRESH_TOKEN_RANDOM_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|_| TokenError::TokenGenerationFailed)?;

        Ok(Self {
            counter,
            secret: hex::encode(bytes),
        })
    }

    /// Issuance counter embedded in the token
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Short form for logs: counter plus the first few secret characters
    pub fn redacted(&self) -> String {
        format!("{}{}{}…", self.counter, REFRESH_TOKEN_SEPARATOR, &self.secret[..6])
    }

    /// Log label for an arbitrary presented string, never echoing its secret
    pub fn log_label(raw: &str) -> String {
        match raw.parse::<RefreshToken>() {
            Ok(token) => token.redacted(),
            Err(_) => String::from("<malformed>"),
        }
    }
}

impl FromStr for RefreshToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (counter, secret) = s
            .split_once(REFRESH_TOKEN_SEPARATOR)
            .ok_or(TokenError::InvalidTokenFormat)?;

        if counter.is_empty() || !counter.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TokenError::InvalidTokenFormat);
        }
        let counter = counter
            .parse::<u64>()
            .map_err(|_| TokenError::InvalidTokenFormat)?;

        let is_lower_hex = secret
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if secret.len() != REFRESH_TOKEN_SECRET_LEN || !is_lower_hex {
            return Err(TokenError::InvalidTokenFormat);
        }

        Ok(Self {
            counter,
            secret: secret.to_string(),
        })
    }
}

impl fmt::Display for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.counter, REFRESH_TOKEN_SEPARATOR, self.secret)
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&self.redacted()).finish()
    }
}

/// Claims structure for JWT access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates new claims for an access token issued now
    pub fn new_access_token(
        user_id: &str,
        issuer: &str,
        audience: &str,
        lifetime: Duration,
    ) -> Self {
        Self::issued_at(user_id, issuer, audience, lifetime, Utc::now())
    }

    /// Creates claims as of an explicit instant
    pub fn issued_at(
        user_id: &str,
        issuer: &str,
        audience: &str,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let expiry = now + lifetime;

        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// The user identifier carried by the token
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// A signed access token as handed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Encoded JWT
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Seconds until expiry
    pub expires_in: i64,
}

impl AccessToken {
    pub fn bearer(token: String, expires_in: i64) -> Self {
        Self {
            token,
            token_type: String::from("Bearer"),
            expires_in,
        }
    }
}
