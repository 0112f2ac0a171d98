use galerie_core::AppError;
use image::ImageFormat;
use std::path::Path;

/// Reasons an upload is rejected before anything is written to storage
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Unsupported content type: {content_type} (allowed: {allowed:?})")]
    UnsupportedContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("File extension '{extension}' does not match content type {content_type}")]
    ExtensionMismatch {
        extension: String,
        content_type: String,
    },

    #[error("File content is not a valid {content_type} image")]
    ContentMismatch { content_type: String },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            UploadError::UnsupportedContentType { .. }
            | UploadError::ExtensionMismatch { .. }
            | UploadError::ContentMismatch { .. } => {
                AppError::UnsupportedMediaType(err.to_string())
            }
            UploadError::InvalidFilename(_) | UploadError::EmptyFile => {
                AppError::InvalidInput(err.to_string())
            }
        }
    }
}

/// Extensions accepted for each supported content type
fn extensions_for(content_type: &str) -> &'static [&'static str] {
    match content_type {
        "image/jpeg" => &["jpg", "jpeg"],
        "image/png" => &["png"],
        _ => &[],
    }
}

fn format_for(content_type: &str) -> Option<ImageFormat> {
    match content_type {
        "image/jpeg" => Some(ImageFormat::Jpeg),
        "image/png" => Some(ImageFormat::Png),
        _ => None,
    }
}

/// Upload validator
///
/// Checks size, declared content type, filename extension and the actual file
/// signature. Runs before storage sees the bytes.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|c| c.to_lowercase())
                .collect(),
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), UploadError> {
        if size == 0 {
            return Err(UploadError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(UploadError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate declared content type
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), UploadError> {
        let normalized = normalize_content_type(content_type);
        if !self.allowed_content_types.iter().any(|c| c == &normalized)
            || format_for(&normalized).is_none()
        {
            return Err(UploadError::UnsupportedContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }
        Ok(())
    }

    /// Validate that the filename extension agrees with the content type
    pub fn validate_extension_content_type_match(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<(), UploadError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| UploadError::InvalidFilename(filename.to_string()))?;

        let normalized = normalize_content_type(content_type);
        if !extensions_for(&normalized).contains(&extension.as_str()) {
            return Err(UploadError::ExtensionMismatch {
                extension,
                content_type: normalized,
            });
        }
        Ok(())
    }

    /// Validate that the bytes carry the signature of the declared format
    pub fn validate_signature(&self, data: &[u8], content_type: &str) -> Result<(), UploadError> {
        let normalized = normalize_content_type(content_type);
        let expected = format_for(&normalized);
        match image::guess_format(data) {
            Ok(actual) if Some(actual) == expected => Ok(()),
            _ => Err(UploadError::ContentMismatch {
                content_type: normalized,
            }),
        }
    }

    /// Run all validations in order: size, content type, extension, signature
    pub fn validate_all(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<(), UploadError> {
        self.validate_file_size(data.len())?;
        self.validate_content_type(content_type)?;
        self.validate_extension_content_type_match(filename, content_type)?;
        self.validate_signature(data, content_type)?;
        Ok(())
    }
}

/// Lowercase and strip parameters (`image/jpeg; charset=binary` -> `image/jpeg`)
fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Cursor;

    fn validator() -> MediaValidator {
        MediaValidator::new(
            1024 * 1024,
            vec!["image/jpeg".to_string(), "image/png".to_string()],
        )
    }

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([1, 2, 3])));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_accepts_jpeg_and_png() {
        let validator = validator();
        assert!(validator
            .validate_all("a.jpg", "image/jpeg", &encoded(ImageFormat::Jpeg))
            .is_ok());
        assert!(validator
            .validate_all("b.JPEG", "image/jpeg", &encoded(ImageFormat::Jpeg))
            .is_ok());
        assert!(validator
            .validate_all("c.png", "image/png", &encoded(ImageFormat::Png))
            .is_ok());
    }

    #[test]
    fn test_rejects_other_media_types() {
        let result = validator().validate_content_type("image/gif");
        assert!(matches!(
            result,
            Err(UploadError::UnsupportedContentType { .. })
        ));
        let err: AppError = result.unwrap_err().into();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
    }

    #[test]
    fn test_size_limits() {
        let validator = MediaValidator::new(10, vec!["image/png".to_string()]);
        assert!(matches!(
            validator.validate_file_size(0),
            Err(UploadError::EmptyFile)
        ));
        assert!(validator.validate_file_size(10).is_ok());

        let err: AppError = validator.validate_file_size(11).unwrap_err().into();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_extension_must_match() {
        let validator = validator();
        assert!(matches!(
            validator.validate_extension_content_type_match("a.png", "image/jpeg"),
            Err(UploadError::ExtensionMismatch { .. })
        ));
        assert!(matches!(
            validator.validate_extension_content_type_match("noext", "image/jpeg"),
            Err(UploadError::InvalidFilename(_))
        ));
    }

    #[test]
    fn test_signature_must_match() {
        let validator = validator();
        assert!(matches!(
            validator.validate_signature(&encoded(ImageFormat::Png), "image/jpeg"),
            Err(UploadError::ContentMismatch { .. })
        ));
        assert!(validator
            .validate_signature(b"plain text", "image/png")
            .is_err());
    }

    #[test]
    fn test_content_type_parameters_ignored() {
        assert!(validator()
            .validate_content_type("Image/JPEG; charset=binary")
            .is_ok());
    }
}
