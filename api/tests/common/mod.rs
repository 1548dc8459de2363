//! Shared setup for the HTTP integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use rk_api::AppState;
use rk_core::repositories::InMemoryClientRepository;
use rk_core::services::{
    AccessTokenConfig, AccessTokenService, RefreshTokenStore, RefreshTokenStoreConfig,
};

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn app_state() -> web::Data<AppState<InMemoryClientRepository>> {
    let store = Arc::new(RefreshTokenStore::new(
        Arc::new(InMemoryClientRepository::new()),
        RefreshTokenStoreConfig::default(),
    ));
    let access_tokens = Arc::new(
        AccessTokenService::new(AccessTokenConfig {
            jwt_secret: TEST_SECRET.to_string(),
            ..Default::default()
        })
        .unwrap(),
    );

    web::Data::new(AppState::new(store, access_tokens))
}

pub fn bearer_for(state: &AppState<InMemoryClientRepository>, user_id: &str) -> String {
    format!("Bearer {}", state.access_tokens.mint(user_id).unwrap().token)
}
