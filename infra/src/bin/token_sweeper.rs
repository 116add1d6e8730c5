//! Periodically deletes expired refresh tokens until interrupted.
//!
//! Configuration comes from `config.<env>.toml` and `DM_`-prefixed
//! environment variables (a `.env` file is loaded first when present).

use std::sync::Arc;

use anyhow::Context;
use dm_core::services::token::{TokenCleanupConfig, TokenCleanupService};
use dm_infra::database::{DatabasePool, MySqlRefreshTokenRepository};
use dm_infra::logging::init_tracing;
use dm_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    tracing::info!(environment = %config.environment, "Starting token sweeper");

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("failed to connect to database")?;
    pool.run_migrations().await?;

    let repository = Arc::new(MySqlRefreshTokenRepository::new(pool.get_pool().clone()));
    let cleanup = Arc::new(TokenCleanupService::new(
        repository,
        TokenCleanupConfig::from(&config.cleanup),
    ));

    let Some(handle) = cleanup.start_background_task() else {
        tracing::warn!("Token cleanup is disabled; nothing to do");
        pool.close().await;
        return Ok(());
    };

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!("Shutdown signal received, stopping token sweeper");
    handle.abort();
    pool.close().await;

    Ok(())
}
