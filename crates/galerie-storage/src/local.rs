use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage: one flat directory of original image files.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating the directory if absent.
    ///
    /// # Arguments
    /// * `base_path` - Directory holding the stored originals (e.g., "./images")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        tracing::info!(path = %base_path.display(), "Image storage directory ready");

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a filename to its path inside the storage directory.
    ///
    /// The directory is flat, so anything that could name a subdirectory or escape the
    /// base directory is rejected.
    fn key_to_path(&self, filename: &str) -> StorageResult<PathBuf> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains('\0')
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key '{}' contains invalid characters",
                filename
            )));
        }

        Ok(self.base_path.join(filename))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(&self, filename: &str, data: Bytes) -> StorageResult<()> {
        let path = self.key_to_path(filename)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %filename,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(())
    }

    async fn read(&self, filename: &str) -> StorageResult<Bytes> {
        let path = self.key_to_path(filename)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(filename.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            key = %filename,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage read successful"
        );

        Ok(Bytes::from(data))
    }

    async fn remove(&self, filename: &str) -> bool {
        let path = match self.key_to_path(filename) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(key = %filename, error = %e, "Refusing to delete invalid storage key");
                return false;
            }
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), key = %filename, "Local storage delete successful");
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), key = %filename, "File already absent");
                false
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    key = %filename,
                    error = %e,
                    "Failed to delete stored file"
                );
                false
            }
        }
    }

    async fn exists(&self, filename: &str) -> StorageResult<bool> {
        let path = self.key_to_path(filename)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn resolve(&self, filename: &str) -> StorageResult<PathBuf> {
        self.key_to_path(filename)
    }
}
