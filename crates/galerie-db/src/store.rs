use async_trait::async_trait;
use galerie_core::models::{Gallery, GallerySummary, Image};
use galerie_core::preview::Removal;
use galerie_core::AppError;
use std::collections::HashSet;
use uuid::Uuid;

/// Repository for gallery documents.
///
/// Every mutating method is a single-document write. There are no operations spanning
/// more than one gallery, so callers must not assume cross-document atomicity.
#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Insert a new gallery. A name collision raises `DuplicateName`.
    async fn insert_gallery(&self, gallery: &Gallery) -> Result<(), AppError>;

    async fn name_exists(&self, name: &str) -> Result<bool, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Gallery>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Gallery>, AppError>;

    /// All galleries without their images, oldest first.
    async fn list(&self) -> Result<Vec<GallerySummary>, AppError>;

    /// Set a new name and rewrite every embedded `fullpath`.
    async fn rename(&self, id: Uuid, name: &str) -> Result<Option<GallerySummary>, AppError>;

    /// Delete and return the removed document.
    async fn delete(&self, id: Uuid) -> Result<Option<Gallery>, AppError>;

    /// Append an image and, when it is the gallery's first, make it the preview in the
    /// same write. Returns the post-append image count, or `None` when the gallery no
    /// longer exists.
    async fn push_image(&self, gallery_id: Uuid, image: &Image) -> Result<Option<usize>, AppError>;

    /// Remove an image by id. The preview is re-elected from the document as it is at
    /// the moment of the write (see [`galerie_core::preview::after_delete`]), never from
    /// an earlier read. Returns `None` when the gallery or image is gone.
    async fn pull_image(&self, gallery_id: Uuid, image_id: Uuid)
        -> Result<Option<Removal>, AppError>;

    /// Make `image_id` the preview if the gallery still embeds it. Returns the image
    /// record, or `None` when the gallery or image is gone.
    async fn set_preview(&self, gallery_id: Uuid, image_id: Uuid)
        -> Result<Option<Image>, AppError>;

    /// The subset of `paths` still referenced by any gallery other than `excluding`.
    async fn referenced_paths(
        &self,
        paths: &[String],
        excluding: Option<Uuid>,
    ) -> Result<HashSet<String>, AppError>;

    /// True if any gallery embeds an image stored as `path`.
    async fn path_in_use(&self, path: &str) -> Result<bool, AppError>;

    /// Connectivity check for health endpoints.
    async fn ping(&self) -> Result<(), AppError>;
}
