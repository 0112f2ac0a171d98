//! Storage abstraction trait
//!
//! This module defines the Storage trait that the artifact store backends implement.

use async_trait::async_trait;
use bytes::Bytes;
use galerie_core::AppError;
use std::path::PathBuf;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("File not found: {}", key)),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Artifact store trait
///
/// Stores uploaded originals by filename. Callers never see backend paths except
/// through `resolve`, which the thumbnail renderer uses to read the source file.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `filename`, replacing any existing file.
    async fn store(&self, filename: &str, data: Bytes) -> StorageResult<()>;

    /// Read the complete file stored under `filename`.
    async fn read(&self, filename: &str) -> StorageResult<Bytes>;

    /// Delete the file stored under `filename`.
    ///
    /// Failures are logged, never returned. Returns true when a file was removed.
    async fn remove(&self, filename: &str) -> bool;

    /// Check if a file exists
    async fn exists(&self, filename: &str) -> StorageResult<bool>;

    /// Filesystem path of `filename`, whether or not the file exists.
    fn resolve(&self, filename: &str) -> StorageResult<PathBuf>;
}
