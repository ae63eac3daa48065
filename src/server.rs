use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::database::{seed_users, DatabaseManager, UserRepository};
use crate::production::MySqlProductionSource;
use crate::state::AppState;

/// Open the credential store and make sure its schema exists.
pub async fn open_credentials(config: &AppConfig) -> anyhow::Result<UserRepository> {
    let pool = DatabaseManager::credentials_pool(&config.database.credentials_url, config.database.max_connections)
        .await
        .context("failed to open credential store")?;
    let users = UserRepository::new(pool);
    users.ensure_schema().await.context("failed to create users table")?;
    Ok(users)
}

/// Seed default users when a seed password is configured.
pub async fn seed(config: &AppConfig, users: &UserRepository) -> anyhow::Result<()> {
    match &config.security.seed_password {
        Some(password) => {
            seed_users(users, password).await.context("failed to seed users")?;
        }
        None => warn!("SEED_DEFAULT_PASSWORD not set; skipping user seeding"),
    }
    Ok(())
}

fn signing_keys(config: &AppConfig) -> JwtKeys {
    if config.security.jwt_secret.is_empty() {
        // Only reachable in development (validate() rejects it elsewhere)
        warn!("JWT_SECRET not set; using a random secret, tokens will not survive a restart");
        let secret = format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple());
        return JwtKeys::from_secret(secret.as_bytes());
    }
    JwtKeys::from_secret(config.security.jwt_secret.as_bytes())
}

pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let users = open_credentials(config).await?;
    seed(config, &users).await?;

    let pool = DatabaseManager::production_pool(
        config.production.url.as_deref(),
        config.database.max_connections,
        Duration::from_secs(config.database.connection_timeout),
    )
    .await;
    let source = MySqlProductionSource::new(
        pool,
        &config.production.event_table,
        &config.production.standard_lot_table,
        Duration::from_secs(config.database.query_timeout_secs),
    )
    .context("invalid production table configuration")?;

    Ok(AppState::new(users, Arc::new(source), Arc::new(signing_keys(config))))
}

pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    config.validate().context("invalid configuration")?;
    info!("Starting chart API in {:?} mode", config.environment);

    let state = build_state(config).await?;
    let app = crate::app::app(state, config);

    let bind_addr = format!("{}:{}", config.server.bind_host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
