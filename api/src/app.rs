//! Application state and factory
//!
//! This module holds the shared application state and provides the factory
//! for creating the Actix-web application.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use rk_core::repositories::ClientRepository;
use rk_core::services::{AccessTokenService, RefreshTokenStore};
use rk_shared::{error_codes, AppConfig, ErrorResponse};

use crate::handlers::error::json_error_handler;
use crate::middleware::cors::create_cors;
use crate::routes;

/// Services shared by all request handlers
pub struct AppState<R: ClientRepository> {
    pub store: Arc<RefreshTokenStore<R>>,
    pub access_tokens: Arc<AccessTokenService>,
}

impl<R: ClientRepository> AppState<R> {
    pub fn new(store: Arc<RefreshTokenStore<R>>, access_tokens: Arc<AccessTokenService>) -> Self {
        Self {
            store,
            access_tokens,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<R: ClientRepository + 'static>(
    app_state: web::Data<AppState<R>>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .limit(config.server.max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state.clone())
        .app_data(json_config)
        // Request spans outermost, then CORS
        .wrap(create_cors(&config.cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(routes::health::health_check))
        .service(
            web::scope("/api/v1")
                .configure(|cfg| routes::auth::configure(cfg, app_state.get_ref())),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
