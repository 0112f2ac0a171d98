//! Database setup and initialization

use anyhow::{Context, Result};
use galerie_core::{Config, DocumentStoreBackend};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Connect to PostgreSQL and run migrations. Returns `None` for the memory store.
pub async fn setup_database(config: &Config) -> Result<Option<PgPool>> {
    if config.document_store() != DocumentStoreBackend::Postgres {
        tracing::info!("Document store is in memory, skipping database setup");
        return Ok(None);
    }

    let database_url = config
        .database_url()
        .context("DATABASE_URL must be set when DOCUMENT_STORE=postgres")?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    galerie_db::MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}
