//! Migrate command - applies the PostgreSQL schema

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{run_storage_migrations, PostgresConfig, PostgresMigrator};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let url = config
        .database_url()
        .context("storage.database_url or DATABASE_URL must be set to run migrations")?;

    let pool = PostgresConfig::new(url)
        .with_max_connections(config.storage.max_connections)
        .connect()
        .await?;

    let applied = run_storage_migrations(&pool).await?;
    let version = PostgresMigrator::new(pool).current_version().await?;

    info!(applied, version = ?version, "Migrations complete");
    Ok(())
}
