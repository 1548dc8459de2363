use actix_web::{web, HttpResponse};
use rk_core::repositories::ClientRepository;

use crate::app::AppState;
use crate::dto::auth::LogoutAllResponse;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/v1/auth/logout-all
///
/// Revokes every refresh token of the authenticated user and reports how
/// many were active.
pub async fn logout_all<R: ClientRepository + 'static>(
    state: web::Data<AppState<R>>,
    auth: AuthContext,
) -> HttpResponse {
    match state.store.revoke_all(&auth.user_id).await {
        Ok(revoked) => HttpResponse::Ok().json(LogoutAllResponse { revoked }),
        Err(error) => handle_domain_error(&error),
    }
}
