//! Authentication route handlers
//!
//! This module contains the refresh token endpoints:
//! - Refresh token issuance for an authenticated user
//! - Exchange of a refresh token for an access token
//! - Logout of one session, or of every session
//! - Removal of a user's client record

pub mod client;
pub mod issue;
pub mod logout;
pub mod logout_all;
pub mod session;
pub mod token;

use actix_web::web;
use rk_core::repositories::ClientRepository;

use crate::app::AppState;
use crate::middleware::auth::JwtAuth;

pub use session::issue_session;

/// Registers the `/auth` scope. Endpoints acting on the caller's own
/// account sit behind `JwtAuth`.
pub fn configure<R: ClientRepository + 'static>(cfg: &mut web::ServiceConfig, state: &AppState<R>) {
    let auth = JwtAuth::new(state.access_tokens.clone());

    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/refresh-tokens")
                    .route(web::post().to(issue::issue::<R>))
                    .wrap(auth.clone()),
            )
            .route("/token", web::post().to(token::exchange::<R>))
            .route("/logout", web::post().to(logout::logout::<R>))
            .service(
                web::resource("/logout-all")
                    .route(web::post().to(logout_all::logout_all::<R>))
                    .wrap(auth.clone()),
            )
            .service(
                web::resource("/client")
                    .route(web::delete().to(client::delete_client::<R>))
                    .wrap(auth),
            ),
    );
}
