use actix_web::{web, HttpResponse};

use rk_infra::database::DatabasePool;

/// Handler for GET /health
///
/// When the MySQL backend is in use the pool is registered as app data and
/// checked on every call; an unreachable database answers 503.
pub async fn health_check(pool: Option<web::Data<DatabasePool>>) -> HttpResponse {
    let database = match pool {
        None => "not_configured",
        Some(pool) => match pool.health_check().await {
            Ok(true) => "up",
            Ok(false) | Err(_) => "down",
        },
    };

    let body = serde_json::json!({
        "status": if database == "down" { "unhealthy" } else { "healthy" },
        "service": "refresh-keeper-api",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if database == "down" {
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}
