use actix_web::{web, HttpResponse};
use rk_core::repositories::ClientRepository;

use crate::app::AppState;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for DELETE /api/v1/auth/client
///
/// Drops the caller's client record. Idempotent: 204 whether or not a
/// record existed.
pub async fn delete_client<R: ClientRepository + 'static>(
    state: web::Data<AppState<R>>,
    auth: AuthContext,
) -> HttpResponse {
    match state.store.purge(&auth.user_id).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(&error),
    }
}
