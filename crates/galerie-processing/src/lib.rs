//! Galerie Processing Library
//!
//! This crate derives thumbnails from stored originals, extracts EXIF metadata from
//! uploads, and validates uploaded files before they reach storage.

pub mod image;
pub mod metadata;
pub mod validator;

// Re-export commonly used types
pub use crate::image::{
    ImageResize, ResizeBounds, ResizeDimensions, ThumbnailError, ThumbnailRenderer,
};
pub use metadata::MetadataExtractor;
pub use validator::{MediaValidator, UploadError};
