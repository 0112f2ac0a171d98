//! Galerie Services Layer
//!
//! This crate is the business service layer: it orchestrates the document store,
//! artifact store, thumbnail renderer and metadata extractor behind a single
//! `GalleryService`, and removes stored files once no gallery references them. The API crate talks to nothing else for gallery operations.

pub mod gallery;
pub mod reaper;

pub use gallery::{GalleryPreview, GalleryService, ImageContent, ImageUpload, ImageView, ViewRequest};
pub use galerie_processing::{MediaValidator, ResizeDimensions, ThumbnailRenderer};
pub use galerie_storage::{LocalStorage, Storage, StorageError, StorageResult};
pub use reaper::FileReaper;
