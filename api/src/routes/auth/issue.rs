use actix_web::{web, HttpResponse};
use rk_core::repositories::ClientRepository;

use crate::app::AppState;
use crate::dto::auth::IssueResponse;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/v1/auth/refresh-tokens
///
/// Issues a new refresh token to the user named by the bearer access token.
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "refresh_token": "3.9f86d081884c7d659a2feaa0c55ad015..."
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing or invalid access token
/// - 500 Internal Server Error: The token store could not persist the token
pub async fn issue<R: ClientRepository + 'static>(
    state: web::Data<AppState<R>>,
    auth: AuthContext,
) -> HttpResponse {
    match state.store.issue(&auth.user_id).await {
        Ok(refresh_token) => HttpResponse::Created().json(IssueResponse { refresh_token }),
        Err(error) => handle_domain_error(&error),
    }
}
