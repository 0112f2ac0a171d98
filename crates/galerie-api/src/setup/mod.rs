//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use galerie_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.environment(),
        document_store = %config.document_store(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let state = services::initialize_services(&config, pool).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
