use actix_web::{web, HttpResponse};
use rk_core::repositories::ClientRepository;
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::{AccessTokenResponse, RefreshTokenRequest};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

/// Handler for POST /api/v1/auth/token
///
/// Exchanges a valid refresh token for a fresh access token. The refresh
/// token stays valid.
///
/// # Request Body
///
/// ```json
/// {
///     "user_id": "alice",
///     "refresh_token": "3.9f86d081..."
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "token_type": "Bearer",
///     "expires_in": 900
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed body
/// - 401 Unauthorized: Unknown user or refresh token not active
/// - 500 Internal Server Error: Store or signing failure
pub async fn exchange<R: ClientRepository + 'static>(
    state: web::Data<AppState<R>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    if let Err(error) = state
        .store
        .validate(&request.user_id, &request.refresh_token)
        .await
    {
        return handle_domain_error(&error);
    }

    match state.access_tokens.mint(&request.user_id) {
        Ok(access) => HttpResponse::Ok().json(AccessTokenResponse::from(access)),
        Err(error) => handle_domain_error(&error),
    }
}
