//! Conversion of domain and request errors into HTTP responses

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use rk_core::errors::{DomainError, StoreError, TokenError};
use rk_shared::errors::error_codes;
use rk_shared::ErrorResponse;
use validator::ValidationErrors;

/// Status code and client-facing error body for a domain error
pub fn error_parts(error: &DomainError) -> (StatusCode, ErrorResponse) {
    let unauthorized = StatusCode::UNAUTHORIZED;
    let internal = StatusCode::INTERNAL_SERVER_ERROR;

    match error {
        DomainError::Store(store_error) => match store_error {
            StoreError::NoSuchClient { .. } => (
                unauthorized,
                ErrorResponse::new(error_codes::NO_SUCH_CLIENT, "No client record for this user"),
            ),
            StoreError::TokenNotFound => (
                unauthorized,
                ErrorResponse::new(error_codes::TOKEN_NOT_FOUND, "Refresh token is not valid"),
            ),
            StoreError::PersistenceFailure { .. }
            | StoreError::ConcurrentCreateConflict { .. }
            | StoreError::ConcurrentUpdateConflict { .. } => (
                internal,
                ErrorResponse::new(
                    error_codes::PERSISTENCE_FAILURE,
                    "The token store is temporarily unavailable",
                ),
            ),
        },
        DomainError::Token(token_error) => match token_error {
            TokenError::TokenExpired => (
                unauthorized,
                ErrorResponse::new(error_codes::TOKEN_EXPIRED, "Access token has expired"),
            ),
            TokenError::InvalidTokenFormat | TokenError::TokenNotYetValid => (
                unauthorized,
                ErrorResponse::new(error_codes::TOKEN_INVALID, "Access token is not valid"),
            ),
            TokenError::TokenGenerationFailed => (
                internal,
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Failed to generate token"),
            ),
        },
        DomainError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone()),
        ),
        DomainError::Internal { .. } => (
            internal,
            ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred"),
        ),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let (status, body) = error_parts(error);

    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    } else {
        tracing::warn!(error = %error, status = status.as_u16(), "Request rejected");
    }

    HttpResponse::build(status).json(body)
}

/// 400 response listing the offending fields
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request body");

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field.to_string(), messages);
    }

    tracing::warn!(fields = ?errors.field_errors().keys().collect::<Vec<_>>(), "Request validation failed");
    HttpResponse::BadRequest().json(response)
}

/// `JsonConfig` error handler so malformed bodies get the standard error shape
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let status = match &err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        _ => StatusCode::BAD_REQUEST,
    };
    let body = ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string());

    actix_web::error::InternalError::from_response(err, HttpResponse::build(status).json(body))
        .into()
}
