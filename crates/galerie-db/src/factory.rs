use std::sync::Arc;

use galerie_core::{AppError, Config, DocumentStoreBackend};
use sqlx::PgPool;

use crate::gallery::PgGalleryRepository;
use crate::memory::InMemoryGalleryStore;
use crate::store::GalleryStore;

/// Build the gallery store selected by `DOCUMENT_STORE`.
///
/// The PostgreSQL backend needs a connected pool; the memory backend ignores it.
pub fn create_gallery_store(
    config: &Config,
    postgres_pool: Option<PgPool>,
) -> Result<Arc<dyn GalleryStore>, AppError> {
    match config.document_store() {
        DocumentStoreBackend::Postgres => {
            let pool = postgres_pool.ok_or_else(|| {
                anyhow::anyhow!("DOCUMENT_STORE=postgres requires a database connection pool")
            })?;
            tracing::info!("Initializing PostgreSQL gallery store");
            Ok(Arc::new(PgGalleryRepository::new(pool)))
        }
        DocumentStoreBackend::Memory => {
            tracing::warn!("Initializing in-memory gallery store; data will not survive a restart");
            Ok(Arc::new(InMemoryGalleryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galerie_core::GalleryConfig;

    #[test]
    fn test_memory_backend_needs_no_pool() {
        let config = Config::from(GalleryConfig::default());
        assert!(create_gallery_store(&config, None).is_ok());
    }

    #[test]
    fn test_postgres_backend_requires_pool() {
        let config = Config::from(GalleryConfig {
            document_store: DocumentStoreBackend::Postgres,
            ..GalleryConfig::default()
        });
        assert!(create_gallery_store(&config, None).is_err());
    }
}
