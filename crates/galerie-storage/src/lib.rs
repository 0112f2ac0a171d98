//! Galerie Storage Library
//!
//! This crate provides the image artifact store: on-disk storage for uploaded
//! originals, addressed by filename.
//!
//! # Key format
//!
//! Storage is a single flat directory. A key is the stored filename itself; keys must
//! not be empty and must not contain `/`, `\` or `..`.

pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
