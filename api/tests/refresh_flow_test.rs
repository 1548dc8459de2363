//! Integration tests for refresh token issuance and exchange

mod common;

use actix_web::{http::header, http::StatusCode, test};
use rk_api::create_app;
use rk_api::routes::auth::issue_session;
use rk_shared::AppConfig;
use serde_json::{json, Value};

#[actix_web::test]
async fn test_issue_then_exchange() {
    let state = common::app_state();
    let app = test::init_service(create_app(state.clone(), &AppConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh-tokens")
        .insert_header((header::AUTHORIZATION, common::bearer_for(&state, "alice")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();
    assert!(refresh_token.starts_with("1."));

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .set_json(json!({ "user_id": "alice", "refresh_token": refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 900);
    let claims = state
        .access_tokens
        .verify(body["access_token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.user_id(), "alice");
}

#[actix_web::test]
async fn test_exchange_does_not_consume_refresh_token() {
    let state = common::app_state();
    let app = test::init_service(create_app(state.clone(), &AppConfig::default())).await;
    let refresh_token = state.store.issue("alice").await.unwrap();

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/token")
            .set_json(json!({ "user_id": "alice", "refresh_token": refresh_token }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn test_exchange_with_unknown_token() {
    let state = common::app_state();
    let app = test::init_service(create_app(state.clone(), &AppConfig::default())).await;
    state.store.issue("alice").await.unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .set_json(json!({ "user_id": "alice", "refresh_token": "1.deadbeef" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_NOT_FOUND");
}

#[actix_web::test]
async fn test_exchange_for_unknown_user() {
    let state = common::app_state();
    let app = test::init_service(create_app(state.clone(), &AppConfig::default())).await;
    let refresh_token = state.store.issue("alice").await.unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .set_json(json!({ "user_id": "bob", "refresh_token": refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NO_SUCH_CLIENT");
}

#[actix_web::test]
async fn test_exchange_rejects_invalid_body() {
    let state = common::app_state();
    let app = test::init_service(create_app(state, &AppConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .set_json(json!({ "user_id": "", "refresh_token": "1.abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["user_id"].is_array());

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[actix_web::test]
async fn test_issue_session_helper() {
    let state = common::app_state();

    let session = issue_session(state.get_ref(), "carol").await.unwrap();

    assert_eq!(session.token_type, "Bearer");
    assert!(state.store.validate("carol", &session.refresh_token).await.is_ok());
    let claims = state.access_tokens.verify(&session.access_token).unwrap();
    assert_eq!(claims.user_id(), "carol");
}

#[actix_web::test]
async fn test_health_and_not_found() {
    let state = common::app_state();
    let app = test::init_service(create_app(state, &AppConfig::default())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "not_configured");

    let req = test::TestRequest::get().uri("/nowhere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
