use rk_core::errors::DomainError;
use rk_core::repositories::ClientRepository;

use crate::app::AppState;
use crate::dto::auth::SessionResponse;

/// Starts a session for a user the caller has already authenticated.
///
/// For login handlers living outside this crate: issues a refresh token and
/// mints an access token to go with it.
pub async fn issue_session<R: ClientRepository + 'static>(
    state: &AppState<R>,
    user_id: &str,
) -> Result<SessionResponse, DomainError> {
    let refresh_token = state.store.issue(user_id).await?;
    let access = state.access_tokens.mint(user_id)?;

    Ok(SessionResponse {
        access_token: access.token,
        refresh_token,
        token_type: access.token_type,
        expires_in: access.expires_in,
    })
}
