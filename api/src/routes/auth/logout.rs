use actix_web::{web, HttpResponse};
use rk_core::repositories::ClientRepository;
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::{LogoutResponse, RefreshTokenRequest};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented refresh token. Possession of the token is the
/// credential, so no access token is required.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logged out successfully"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed body
/// - 401 Unauthorized: Unknown user or token already revoked
/// - 500 Internal Server Error: Revocation could not be persisted; the
///   token is still valid
pub async fn logout<R: ClientRepository + 'static>(
    state: web::Data<AppState<R>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    match state
        .store
        .revoke(&request.user_id, &request.refresh_token)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
