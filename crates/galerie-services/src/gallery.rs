use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use galerie_core::models::{Gallery, GalleryDetail, GallerySummary, Image};
use galerie_core::validation::validate_image_filename;
use galerie_core::{AppError, Config, FilenameScope, GalleryNamePolicy};
use galerie_db::GalleryStore;
use galerie_processing::{
    MediaValidator, MetadataExtractor, ResizeBounds, ResizeDimensions, ThumbnailError,
    ThumbnailRenderer,
};
use galerie_storage::{Storage, StorageError};
use uuid::Uuid;

use crate::reaper::FileReaper;

const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

/// How a caller wants an image returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewRequest {
    /// Return the JSON record instead of bytes
    pub metadata: bool,
    /// Resize before returning; ignored when `metadata` is set
    pub dimensions: Option<ResizeDimensions>,
}

impl ViewRequest {
    pub fn original() -> Self {
        Self::default()
    }

    pub fn metadata() -> Self {
        Self {
            metadata: true,
            dimensions: None,
        }
    }

    pub fn resized(dimensions: ResizeDimensions) -> Self {
        Self {
            metadata: false,
            dimensions: Some(dimensions),
        }
    }
}

/// Encoded image bytes ready to send.
#[derive(Debug, Clone)]
pub struct ImageContent {
    pub bytes: Bytes,
    pub content_type: &'static str,
}

#[derive(Debug, Clone)]
pub enum GalleryPreview {
    Metadata(GalleryDetail),
    Content(ImageContent),
}

#[derive(Debug, Clone)]
pub enum ImageView {
    Metadata(Image),
    Content(ImageContent),
}

/// An upload accepted by the HTTP layer, not yet validated.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Gallery and image operations.
///
/// Document changes go through `GalleryStore` one write at a time. Each write applies
/// the preview rules of [`galerie_core::preview`] to the document it changes, so reads
/// made here only decide which errors to report. File removals are handed to the
/// [`FileReaper`].
#[derive(Clone)]
pub struct GalleryService {
    store: Arc<dyn GalleryStore>,
    storage: Arc<dyn Storage>,
    reaper: FileReaper,
    renderer: ThumbnailRenderer,
    extractor: MetadataExtractor,
    validator: MediaValidator,
    names: GalleryNamePolicy,
    filename_scope: FilenameScope,
    default_preview: PathBuf,
}

impl GalleryService {
    pub fn new(config: &Config, store: Arc<dyn GalleryStore>, storage: Arc<dyn Storage>) -> Self {
        let bounds = ResizeBounds::new(
            config.thumbnail_min_dimension(),
            config.thumbnail_max_dimension(),
        );

        Self {
            reaper: FileReaper::new(store.clone(), storage.clone()),
            store,
            storage,
            renderer: ThumbnailRenderer::new(bounds, config.thumbnail_jpeg_quality()),
            extractor: MetadataExtractor::new(config.exif_tags()),
            validator: MediaValidator::new(
                config.max_file_size_bytes(),
                config.allowed_content_types().to_vec(),
            ),
            names: GalleryNamePolicy::new(config.reserved_gallery_names().to_vec()),
            filename_scope: config.filename_scope(),
            default_preview: config.default_preview_path().to_path_buf(),
        }
    }

    pub fn reaper(&self) -> &FileReaper {
        &self.reaper
    }

    /// Wait for scheduled file removals to finish.
    pub async fn wait_for_pending_removals(&self) {
        self.reaper.wait_idle().await;
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_gallery(&self, name: &str) -> Result<Gallery, AppError> {
        let name = self.names.validate(name)?;

        // The unique index on name catches whatever slips through this check
        if self.store.name_exists(&name).await? {
            return Err(duplicate_name(&name));
        }

        let gallery = Gallery::new(name);
        self.store.insert_gallery(&gallery).await?;

        tracing::info!(gallery_id = %gallery.id, name = %gallery.name, "Gallery created");
        Ok(gallery)
    }

    pub async fn list_galleries(&self) -> Result<Vec<GallerySummary>, AppError> {
        self.store.list().await
    }

    pub async fn get_gallery(&self, id: Uuid) -> Result<Gallery, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| gallery_not_found(&id.to_string()))
    }

    /// The gallery's preview image as bytes, or the gallery document when
    /// `view.metadata` is set. An unset or missing preview falls back to the default
    /// image.
    #[tracing::instrument(skip(self))]
    pub async fn get_gallery_preview(
        &self,
        id: Uuid,
        view: ViewRequest,
    ) -> Result<GalleryPreview, AppError> {
        if let Some(dimensions) = view.dimensions.filter(|_| !view.metadata) {
            self.renderer.validate(dimensions)?;
        }

        let gallery = self.get_gallery(id).await?;
        if view.metadata {
            return Ok(GalleryPreview::Metadata(GalleryDetail::from(gallery)));
        }

        if let Some(image) = gallery.preview_image() {
            match self.load_stored(image, view.dimensions).await {
                Ok(content) => return Ok(GalleryPreview::Content(content)),
                Err(AppError::NotFound(_)) => {
                    tracing::warn!(
                        gallery_id = %gallery.id,
                        path = %image.path,
                        "Preview file missing, serving default image"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        self.load_default(view.dimensions)
            .await
            .map(GalleryPreview::Content)
    }

    #[tracing::instrument(skip(self))]
    pub async fn rename_gallery(&self, id: Uuid, new_name: &str) -> Result<GallerySummary, AppError> {
        let name = self.names.validate(new_name)?;

        if let Some(existing) = self.store.find_by_name(&name).await? {
            if existing.id != id {
                return Err(duplicate_name(&name));
            }
        }

        let gallery = self
            .store
            .rename(id, &name)
            .await?
            .ok_or_else(|| gallery_not_found(&id.to_string()))?;

        tracing::info!(gallery_id = %gallery.id, name = %gallery.name, "Gallery renamed");
        Ok(gallery)
    }

    /// Delete the document first, then schedule removal of every file that no
    /// surviving gallery references.
    #[tracing::instrument(skip(self))]
    pub async fn delete_gallery(&self, id: Uuid) -> Result<Gallery, AppError> {
        let gallery = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| gallery_not_found(&id.to_string()))?;

        let paths: Vec<String> = gallery.images.iter().map(|i| i.path.clone()).collect();
        tracing::info!(
            gallery_id = %gallery.id,
            images = paths.len(),
            "Gallery deleted"
        );
        self.reaper.remove_unreferenced(paths, None);

        Ok(gallery)
    }

    pub async fn ensure_gallery_exists(&self, gallery_name: &str) -> Result<Gallery, AppError> {
        self.store
            .find_by_name(gallery_name)
            .await?
            .ok_or_else(|| gallery_not_found(gallery_name))
    }

    pub async fn list_images(&self, gallery_name: &str) -> Result<Vec<Image>, AppError> {
        Ok(self.ensure_gallery_exists(gallery_name).await?.images)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_image(
        &self,
        gallery_name: &str,
        image_id: Uuid,
        view: ViewRequest,
    ) -> Result<ImageView, AppError> {
        if let Some(dimensions) = view.dimensions.filter(|_| !view.metadata) {
            self.renderer.validate(dimensions)?;
        }

        let gallery = self.ensure_gallery_exists(gallery_name).await?;
        let (_, image) = gallery
            .find_image(image_id)
            .ok_or_else(|| image_not_found(image_id, gallery_name))?;

        if view.metadata {
            return Ok(ImageView::Metadata(image.clone()));
        }

        self.load_stored(image, view.dimensions)
            .await
            .map(ImageView::Content)
    }

    /// Validate, store and register an uploaded image. The first image of a gallery
    /// becomes its preview.
    #[tracing::instrument(skip(self, upload), fields(filename = %upload.filename, size = upload.data.len()))]
    pub async fn upload_image(
        &self,
        gallery_name: &str,
        upload: ImageUpload,
    ) -> Result<Image, AppError> {
        validate_image_filename(&upload.filename)?;
        self.validator
            .validate_all(&upload.filename, &upload.content_type, &upload.data)?;

        let gallery = self.ensure_gallery_exists(gallery_name).await?;
        let taken = match self.filename_scope {
            FilenameScope::System => self.store.path_in_use(&upload.filename).await?,
            FilenameScope::Gallery => gallery.contains_path(&upload.filename),
        };
        if taken {
            return Err(AppError::DuplicateFilename(format!(
                "An image named '{}' already exists",
                upload.filename
            )));
        }

        self.storage
            .store(&upload.filename, upload.data)
            .await
            .map_err(AppError::from)?;

        let exif = match self.storage.resolve(&upload.filename) {
            Ok(path) => self.extractor.extract(&path).await,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot resolve stored file for EXIF extraction");
                None
            }
        };

        let image = Image::new(&gallery.name, &upload.filename, exif);
        let Some(count) = self.store.push_image(gallery.id, &image).await? else {
            // Deleted while the upload was in flight
            self.reaper
                .remove_unreferenced(vec![upload.filename.clone()], None);
            return Err(gallery_not_found(gallery_name));
        };

        tracing::info!(
            gallery_id = %gallery.id,
            image_id = %image.id,
            images = count,
            "Image uploaded"
        );
        Ok(image)
    }

    /// Make `image_id` the gallery's preview.
    #[tracing::instrument(skip(self))]
    pub async fn set_preview(&self, gallery_name: &str, image_id: Uuid) -> Result<Image, AppError> {
        let gallery = self.ensure_gallery_exists(gallery_name).await?;
        self.store
            .set_preview(gallery.id, image_id)
            .await?
            .ok_or_else(|| image_not_found(image_id, gallery_name))
    }

    /// Remove an image, re-electing the preview when needed, and schedule removal of
    /// its file unless another gallery still references it.
    #[tracing::instrument(skip(self))]
    pub async fn delete_image(&self, gallery_name: &str, image_id: Uuid) -> Result<Image, AppError> {
        let gallery = self.ensure_gallery_exists(gallery_name).await?;
        let removal = self
            .store
            .pull_image(gallery.id, image_id)
            .await?
            .ok_or_else(|| image_not_found(image_id, gallery_name))?;

        tracing::info!(
            gallery_id = %gallery.id,
            image_id = %image_id,
            index = removal.index,
            preview = ?removal.preview,
            "Image deleted"
        );
        self.reaper
            .remove_unreferenced(vec![removal.image.path.clone()], Some(gallery.id));

        Ok(removal.image)
    }

    /// Original bytes or a thumbnail of a stored image. A missing file is `NotFound`.
    async fn load_stored(
        &self,
        image: &Image,
        dimensions: Option<ResizeDimensions>,
    ) -> Result<ImageContent, AppError> {
        match dimensions {
            Some(dimensions) => {
                let source = self.storage.resolve(&image.path)?;
                let bytes = self.renderer.render(&source, dimensions).await?;
                Ok(ImageContent {
                    bytes,
                    content_type: THUMBNAIL_CONTENT_TYPE,
                })
            }
            None => {
                let bytes = self.storage.read(&image.path).await.map_err(|e| match e {
                    StorageError::NotFound(_) => AppError::NotFound(format!(
                        "Image file {} is missing",
                        image.path
                    )),
                    other => AppError::from(other),
                })?;
                Ok(ImageContent {
                    bytes,
                    content_type: image.content_type(),
                })
            }
        }
    }

    async fn load_default(
        &self,
        dimensions: Option<ResizeDimensions>,
    ) -> Result<ImageContent, AppError> {
        let path = self.default_preview.as_path();
        match dimensions {
            Some(dimensions) => match self.renderer.render(path, dimensions).await {
                Ok(bytes) => Ok(ImageContent {
                    bytes,
                    content_type: THUMBNAIL_CONTENT_TYPE,
                }),
                Err(ThumbnailError::SourceNotFound(_)) => Err(default_missing(path)),
                Err(e) => Err(e.into()),
            },
            None => match tokio::fs::read(path).await {
                Ok(data) => Ok(ImageContent {
                    bytes: Bytes::from(data),
                    content_type: THUMBNAIL_CONTENT_TYPE,
                }),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(default_missing(path)),
                Err(e) => Err(AppError::Storage(format!(
                    "Failed to read default preview {}: {}",
                    path.display(),
                    e
                ))),
            },
        }
    }
}

fn gallery_not_found(gallery: &str) -> AppError {
    AppError::GalleryNotFound(format!("Gallery '{}' does not exist", gallery))
}

fn image_not_found(image_id: Uuid, gallery: &str) -> AppError {
    AppError::ImageNotFound(format!(
        "Image {} does not exist in gallery '{}'",
        image_id, gallery
    ))
}

fn duplicate_name(name: &str) -> AppError {
    AppError::DuplicateName(format!("A gallery named '{}' already exists", name))
}

fn default_missing(path: &Path) -> AppError {
    tracing::error!(path = %path.display(), "Default preview image is missing");
    AppError::Internal(format!(
        "Default preview image {} is missing",
        path.display()
    ))
}
