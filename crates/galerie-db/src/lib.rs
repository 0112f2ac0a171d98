//! Galerie Database Library
//!
//! This crate owns gallery documents. `GalleryStore` is the repository contract;
//! `PgGalleryRepository` keeps one JSONB document per gallery in PostgreSQL and
//! `InMemoryGalleryStore` keeps them in process.

pub mod factory;
pub mod gallery;
pub mod memory;
pub mod store;

pub use factory::create_gallery_store;
pub use gallery::PgGalleryRepository;
pub use memory::InMemoryGalleryStore;
pub use store::GalleryStore;

/// Schema migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
