use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use utoipa::ToSchema;
use uuid::Uuid;

/// Flat mapping of EXIF tag name to extracted value.
pub type ExifData = BTreeMap<String, serde_json::Value>;

/// An image record embedded in its owning gallery document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Image {
    pub id: Uuid,
    /// Stored filename in the flat image directory
    pub path: String,
    /// Display path `"{galleryName}/{path}"`
    pub fullpath: String,
    /// Filename without extension
    pub name: String,
    pub uploaded: DateTime<Utc>,
    #[schema(value_type = Option<Object>)]
    pub exif: Option<ExifData>,
}

impl Image {
    pub fn new(gallery_name: &str, path: &str, exif: Option<ExifData>) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.to_string(),
            fullpath: Self::display_path(gallery_name, path),
            name: Self::display_name(path),
            uploaded: Utc::now(),
            exif,
        }
    }

    pub fn display_path(gallery_name: &str, path: &str) -> String {
        format!("{}/{}", gallery_name, path)
    }

    pub fn display_name(path: &str) -> String {
        Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(path)
            .to_string()
    }

    /// Content type of the stored original, inferred from its extension.
    pub fn content_type(&self) -> &'static str {
        let ext = Path::new(&self.path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("png") => "image/png",
            _ => "image/jpeg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_fields() {
        let image = Image::new("alpha", "sunset.beach.jpg", None);
        assert_eq!(image.path, "sunset.beach.jpg");
        assert_eq!(image.fullpath, "alpha/sunset.beach.jpg");
        assert_eq!(image.name, "sunset.beach");
        assert!(image.exif.is_none());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(Image::new("alpha", "a.PNG", None).content_type(), "image/png");
        assert_eq!(Image::new("alpha", "a.jpeg", None).content_type(), "image/jpeg");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Image::new("alpha", "a.jpg", None);
        let b = Image::new("alpha", "a.jpg", None);
        assert_ne!(a.id, b.id);
    }
}
