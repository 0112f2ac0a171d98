//! Service and repository wiring

use anyhow::{Context, Result};
use galerie_core::Config;
use galerie_db::create_gallery_store;
use galerie_services::{LocalStorage, Storage};
use sqlx::PgPool;
use std::sync::Arc;

use crate::state::AppState;

/// Build the document store, the artifact store and the gallery service.
pub async fn initialize_services(config: &Config, pool: Option<PgPool>) -> Result<Arc<AppState>> {
    let store = create_gallery_store(config, pool).context("Failed to create gallery store")?;

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(config.image_folder())
            .await
            .context("Failed to prepare image folder")?,
    );

    if !config.default_preview_path().exists() {
        tracing::warn!(
            path = %config.default_preview_path().display(),
            "Default preview image not found; galleries without a preview will fail to render"
        );
    }

    tracing::info!(
        image_folder = %config.image_folder().display(),
        filename_scope = ?config.filename_scope(),
        exif_tags = config.exif_tags().len(),
        "Gallery service initialized"
    );

    Ok(Arc::new(AppState::new(config.clone(), store, storage)))
}
