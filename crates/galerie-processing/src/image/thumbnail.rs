use bytes::Bytes;
use galerie_core::AppError;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::resize::{ImageResize, ResizeBounds, ResizeDimensions};

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Source image not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Failed to read source image: {0}")]
    Read(String),

    #[error("Failed to decode source image: {0}")]
    Decode(String),

    #[error("Failed to encode thumbnail: {0}")]
    Encode(String),

    #[error("Thumbnail task failed: {0}")]
    Task(String),
}

impl From<ThumbnailError> for AppError {
    fn from(err: ThumbnailError) -> Self {
        match err {
            ThumbnailError::InvalidDimensions(msg) => AppError::InvalidInput(msg),
            ThumbnailError::SourceNotFound(path) => {
                AppError::NotFound(format!("Image file {} is missing", path.display()))
            }
            ThumbnailError::Read(msg) => AppError::Storage(msg),
            ThumbnailError::Decode(msg) | ThumbnailError::Encode(msg) => {
                AppError::ImageProcessing(msg)
            }
            ThumbnailError::Task(msg) => AppError::Internal(msg),
        }
    }
}

/// Derives resized JPEG thumbnails from source files on demand. Nothing is cached:
/// every call decodes the source again.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailRenderer {
    bounds: ResizeBounds,
    jpeg_quality: u8,
}

impl ThumbnailRenderer {
    pub fn new(bounds: ResizeBounds, jpeg_quality: u8) -> Self {
        Self {
            bounds,
            jpeg_quality,
        }
    }

    /// Reject out-of-range or empty requests. Runs before any file I/O.
    pub fn validate(&self, dimensions: ResizeDimensions) -> Result<(), ThumbnailError> {
        self.bounds
            .check(dimensions)
            .map_err(ThumbnailError::InvalidDimensions)
    }

    /// Render `source` to a JPEG of the requested size.
    #[tracing::instrument(skip(self, source), fields(source = %source.display()))]
    pub async fn render(
        &self,
        source: &Path,
        dimensions: ResizeDimensions,
    ) -> Result<Bytes, ThumbnailError> {
        self.validate(dimensions)?;

        let data = match tokio::fs::read(source).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ThumbnailError::SourceNotFound(source.to_path_buf()));
            }
            Err(e) => {
                return Err(ThumbnailError::Read(format!(
                    "Failed to read {}: {}",
                    source.display(),
                    e
                )));
            }
        };

        let start = std::time::Instant::now();
        let quality = self.jpeg_quality;
        let output = tokio::task::spawn_blocking(move || {
            Self::render_bytes(&data, dimensions, quality)
        })
        .await
        .map_err(|e| ThumbnailError::Task(e.to_string()))??;

        tracing::debug!(
            size_bytes = output.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Thumbnail rendered"
        );

        Ok(output)
    }

    /// Decode, resize and JPEG-encode an in-memory image.
    pub fn render_bytes(
        data: &[u8],
        dimensions: ResizeDimensions,
        jpeg_quality: u8,
    ) -> Result<Bytes, ThumbnailError> {
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ThumbnailError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| ThumbnailError::Decode(e.to_string()))?;

        let (orig_width, orig_height) = img.dimensions();
        let resized = ImageResize::apply(&img, dimensions);

        tracing::debug!(
            orig_width,
            orig_height,
            width = resized.width(),
            height = resized.height(),
            "Resized image"
        );

        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

        let mut output = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut output, jpeg_quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| ThumbnailError::Encode(e.to_string()))?;

        Ok(Bytes::from(output))
    }
}
