use rk_core::domain::entities::token::AccessToken;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of the exchange and logout endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    /// Opaque user identifier the token was issued to
    #[validate(length(min = 1, max = 191))]
    pub user_id: String,

    /// At most a 20-digit counter, the separator and 80 hex characters
    #[validate(length(min = 1, max = 101))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueResponse {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<AccessToken> for AccessTokenResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.token,
            token_type: token.token_type,
            expires_in: token.expires_in,
        }
    }
}

/// Credentials handed out after a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutAllResponse {
    pub revoked: usize,
}
