use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::image::Image;

/// A gallery document: name, creation time, embedded images in insertion order, and an
/// optional reference to the preview image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Gallery {
    pub id: Uuid,
    pub name: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub preview: Option<Uuid>,
}

impl Gallery {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created: Utc::now(),
            images: Vec::new(),
            preview: None,
        }
    }

    /// Position and record of an embedded image.
    pub fn find_image(&self, image_id: Uuid) -> Option<(usize, &Image)> {
        self.images
            .iter()
            .enumerate()
            .find(|(_, image)| image.id == image_id)
    }

    pub fn preview_image(&self) -> Option<&Image> {
        self.preview
            .and_then(|id| self.find_image(id))
            .map(|(_, image)| image)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.images.iter().any(|image| image.path == path)
    }

    /// `preview` references an embedded image, and is unset when there are no images.
    pub fn preview_is_consistent(&self) -> bool {
        match self.preview {
            Some(id) => self.find_image(id).is_some(),
            None => true,
        }
    }
}

/// Gallery without its images, used for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct GallerySummary {
    pub id: Uuid,
    pub name: String,
    pub created: DateTime<Utc>,
    pub preview: Option<Uuid>,
}

impl From<Gallery> for GallerySummary {
    fn from(gallery: Gallery) -> Self {
        Self {
            id: gallery.id,
            name: gallery.name,
            created: gallery.created,
            preview: gallery.preview,
        }
    }
}

/// Gallery with the preview reference resolved to the image record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GalleryDetail {
    pub id: Uuid,
    pub name: String,
    pub created: DateTime<Utc>,
    pub images: Vec<Image>,
    pub preview: Option<Image>,
}

impl From<Gallery> for GalleryDetail {
    fn from(gallery: Gallery) -> Self {
        let preview = gallery.preview_image().cloned();
        Self {
            id: gallery.id,
            name: gallery.name,
            created: gallery.created,
            images: gallery.images,
            preview,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGalleryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameGalleryRequest {
    pub name: String,
}
