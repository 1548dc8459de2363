use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use rk_api::{create_app, AppState};
use rk_core::repositories::{ClientRepository, InMemoryClientRepository};
use rk_core::services::{
    AccessTokenConfig, AccessTokenService, RefreshTokenStore, RefreshTokenStoreConfig,
};
use rk_infra::database::{DatabasePool, MySqlClientRepository};
use rk_shared::{AppConfig, StoreBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    rk_shared::logging::init(&config.logging).context("failed to initialise logging")?;

    info!(
        environment = %config.environment,
        bind = %config.server.bind_address(),
        backend = ?config.store.backend,
        "Starting Refresh Keeper API"
    );

    if config.jwt.is_using_default_secret() {
        warn!("Using the built-in JWT secret; set RK__JWT__SECRET before exposing this server");
    }

    let access_tokens = Arc::new(
        AccessTokenService::new(AccessTokenConfig::from(&config.jwt))
            .context("invalid access token configuration")?,
    );

    match config.store.backend {
        StoreBackend::Memory => {
            warn!("Client records are kept in memory and will be lost on restart");
            let repository = Arc::new(InMemoryClientRepository::new());
            serve(&config, repository, access_tokens, None).await?;
        }
        StoreBackend::Mysql => {
            let pool = DatabasePool::new(&config.database)
                .await
                .context("failed to connect to the database")?;
            pool.ensure_schema()
                .await
                .context("failed to prepare the database schema")?;

            let repository = Arc::new(MySqlClientRepository::new(pool.pool().clone()));
            let result = serve(&config, repository, access_tokens, Some(pool.clone())).await;

            pool.close().await;
            result?;
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn serve<R: ClientRepository + 'static>(
    config: &AppConfig,
    repository: Arc<R>,
    access_tokens: Arc<AccessTokenService>,
    database: Option<DatabasePool>,
) -> std::io::Result<()> {
    let store = Arc::new(RefreshTokenStore::new(
        repository,
        RefreshTokenStoreConfig::from(&config.store),
    ));
    let state = web::Data::new(AppState::new(store, access_tokens));
    let database = database.map(web::Data::new);
    let app_config = config.clone();

    let mut server = HttpServer::new(move || {
        let app = create_app(state.clone(), &app_config);
        match &database {
            Some(pool) => app.app_data(pool.clone()),
            None => app,
        }
    })
    .keep_alive(Duration::from_secs(config.server.keep_alive))
    .shutdown_timeout(config.server.shutdown_timeout);
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(config.server.bind_address())?.run().await
}
