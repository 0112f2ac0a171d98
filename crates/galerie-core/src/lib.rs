//! Galerie Core Library
//!
//! This crate provides the gallery domain models, preview rules, error types,
//! configuration, and validation rules shared across all Galerie components.

pub mod config;
pub mod error;
pub mod models;
pub mod preview;
pub mod store_backend;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, FilenameScope, GalleryConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use preview::PreviewUpdate;
pub use store_backend::DocumentStoreBackend;
pub use validation::GalleryNamePolicy;
