use async_trait::async_trait;
use galerie_core::models::{Gallery, GallerySummary, Image};
use galerie_core::preview::{self, Removal};
use galerie_core::AppError;
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::GalleryStore;

/// Process-local gallery store. Each method holds the lock for one whole document
/// update, matching the single-document atomicity of the PostgreSQL repository.
#[derive(Default)]
pub struct InMemoryGalleryStore {
    galleries: RwLock<Vec<Gallery>>,
}

impl InMemoryGalleryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GalleryStore for InMemoryGalleryStore {
    async fn insert_gallery(&self, gallery: &Gallery) -> Result<(), AppError> {
        let mut galleries = self.galleries.write().await;
        if galleries.iter().any(|g| g.name == gallery.name) {
            return Err(AppError::DuplicateName(format!(
                "A gallery named '{}' already exists",
                gallery.name
            )));
        }
        galleries.push(gallery.clone());
        Ok(())
    }

    async fn name_exists(&self, name: &str) -> Result<bool, AppError> {
        let galleries = self.galleries.read().await;
        Ok(galleries.iter().any(|g| g.name == name))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Gallery>, AppError> {
        let galleries = self.galleries.read().await;
        Ok(galleries.iter().find(|g| g.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Gallery>, AppError> {
        let galleries = self.galleries.read().await;
        Ok(galleries.iter().find(|g| g.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<GallerySummary>, AppError> {
        let galleries = self.galleries.read().await;
        Ok(galleries.iter().cloned().map(GallerySummary::from).collect())
    }

    async fn rename(&self, id: Uuid, name: &str) -> Result<Option<GallerySummary>, AppError> {
        let mut galleries = self.galleries.write().await;
        if galleries.iter().any(|g| g.id != id && g.name == name) {
            return Err(AppError::DuplicateName(format!(
                "A gallery named '{}' already exists",
                name
            )));
        }

        let Some(gallery) = galleries.iter_mut().find(|g| g.id == id) else {
            return Ok(None);
        };
        gallery.name = name.to_string();
        for image in &mut gallery.images {
            image.fullpath = Image::display_path(name, &image.path);
        }
        Ok(Some(GallerySummary::from(gallery.clone())))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Gallery>, AppError> {
        let mut galleries = self.galleries.write().await;
        let position = galleries.iter().position(|g| g.id == id);
        Ok(position.map(|index| galleries.remove(index)))
    }

    async fn push_image(&self, gallery_id: Uuid, image: &Image) -> Result<Option<usize>, AppError> {
        let mut galleries = self.galleries.write().await;
        let Some(gallery) = galleries.iter_mut().find(|g| g.id == gallery_id) else {
            return Ok(None);
        };
        Ok(Some(preview::append_image(gallery, image.clone())))
    }

    async fn pull_image(
        &self,
        gallery_id: Uuid,
        image_id: Uuid,
    ) -> Result<Option<Removal>, AppError> {
        let mut galleries = self.galleries.write().await;
        let Some(gallery) = galleries.iter_mut().find(|g| g.id == gallery_id) else {
            return Ok(None);
        };
        Ok(preview::remove_image(gallery, image_id))
    }

    async fn set_preview(&self, gallery_id: Uuid, image_id: Uuid) -> Result<Option<Image>, AppError> {
        let mut galleries = self.galleries.write().await;
        let Some(gallery) = galleries.iter_mut().find(|g| g.id == gallery_id) else {
            return Ok(None);
        };
        let Some((_, image)) = gallery.find_image(image_id) else {
            return Ok(None);
        };
        let image = image.clone();
        gallery.preview = Some(image_id);
        Ok(Some(image))
    }

    async fn referenced_paths(
        &self,
        paths: &[String],
        excluding: Option<Uuid>,
    ) -> Result<HashSet<String>, AppError> {
        let galleries = self.galleries.read().await;
        Ok(galleries
            .iter()
            .filter(|g| Some(g.id) != excluding)
            .flat_map(|g| g.images.iter())
            .filter(|image| paths.contains(&image.path))
            .map(|image| image.path.clone())
            .collect())
    }

    async fn path_in_use(&self, path: &str) -> Result<bool, AppError> {
        let galleries = self.galleries.read().await;
        Ok(galleries.iter().any(|g| g.contains_path(path)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
