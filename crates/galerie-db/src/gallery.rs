use async_trait::async_trait;
use chrono::{DateTime, Utc};
use galerie_core::models::{Gallery, GallerySummary, Image};
use galerie_core::preview::{self, Removal};
use galerie_core::AppError;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};
use std::collections::HashSet;
use uuid::Uuid;

use crate::store::GalleryStore;

#[derive(Debug, FromRow)]
struct GalleryRow {
    id: Uuid,
    name: String,
    created: DateTime<Utc>,
    images: Json<Vec<Image>>,
    preview: Option<Uuid>,
}

impl From<GalleryRow> for Gallery {
    fn from(row: GalleryRow) -> Self {
        Gallery {
            id: row.id,
            name: row.name,
            created: row.created,
            images: row.images.0,
            preview: row.preview,
        }
    }
}

/// Repository for gallery documents stored as PostgreSQL rows with a JSONB image array
#[derive(Clone)]
pub struct PgGalleryRepository {
    pool: PgPool,
}

impl PgGalleryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GalleryStore for PgGalleryRepository {
    #[tracing::instrument(skip(self, gallery), fields(db.table = "galleries", db.operation = "insert", gallery.name = %gallery.name))]
    async fn insert_gallery(&self, gallery: &Gallery) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO galleries (id, name, created, images, preview)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(gallery.id)
        .bind(&gallery.name)
        .bind(gallery.created)
        .bind(Json(&gallery.images))
        .bind(gallery.preview)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_name_write(e, &gallery.name))?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "galleries", db.operation = "select"))]
    async fn name_exists(&self, name: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM galleries WHERE name = $1)",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[tracing::instrument(skip(self), fields(db.table = "galleries", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Gallery>, AppError> {
        let row = sqlx::query_as::<Postgres, GalleryRow>(
            "SELECT id, name, created, images, preview FROM galleries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Gallery::from))
    }

    #[tracing::instrument(skip(self), fields(db.table = "galleries", db.operation = "select"))]
    async fn find_by_name(&self, name: &str) -> Result<Option<Gallery>, AppError> {
        let row = sqlx::query_as::<Postgres, GalleryRow>(
            "SELECT id, name, created, images, preview FROM galleries WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Gallery::from))
    }

    #[tracing::instrument(skip(self), fields(db.table = "galleries", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<GallerySummary>, AppError> {
        let galleries = sqlx::query_as::<Postgres, GallerySummary>(
            "SELECT id, name, created, preview FROM galleries ORDER BY created ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(galleries)
    }

    #[tracing::instrument(skip(self), fields(db.table = "galleries", db.operation = "update", db.record_id = %id))]
    async fn rename(&self, id: Uuid, name: &str) -> Result<Option<GallerySummary>, AppError> {
        let gallery = sqlx::query_as::<Postgres, GallerySummary>(
            r#"
            UPDATE galleries
            SET name = $2,
                images = COALESCE(
                    (SELECT jsonb_agg(
                                jsonb_set(e, '{fullpath}', to_jsonb($2::text || '/' || (e->>'path')))
                                ORDER BY ord)
                     FROM jsonb_array_elements(images) WITH ORDINALITY AS t(e, ord)),
                    '[]'::jsonb)
            WHERE id = $1
            RETURNING id, name, created, preview
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_name_write(e, name))?;

        Ok(gallery)
    }

    #[tracing::instrument(skip(self), fields(db.table = "galleries", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<Option<Gallery>, AppError> {
        let row = sqlx::query_as::<Postgres, GalleryRow>(
            "DELETE FROM galleries WHERE id = $1 RETURNING id, name, created, images, preview",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Gallery::from))
    }

    #[tracing::instrument(skip(self, image), fields(db.table = "galleries", db.operation = "update", db.record_id = %gallery_id, image.id = %image.id))]
    async fn push_image(&self, gallery_id: Uuid, image: &Image) -> Result<Option<usize>, AppError> {
        // Both SET expressions see the pre-append row
        let length = sqlx::query_scalar::<Postgres, i32>(
            r#"
            UPDATE galleries
            SET images = images || jsonb_build_array($2::jsonb),
                preview = CASE WHEN jsonb_array_length(images) = 0 THEN $3 ELSE preview END
            WHERE id = $1
            RETURNING jsonb_array_length(images)
            "#,
        )
        .bind(gallery_id)
        .bind(Json(image))
        .bind(image.id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(length.map(|n| n.max(0) as usize))
    }

    #[tracing::instrument(skip(self), fields(db.table = "galleries", db.operation = "update", db.record_id = %gallery_id))]
    async fn pull_image(
        &self,
        gallery_id: Uuid,
        image_id: Uuid,
    ) -> Result<Option<Removal>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock held until commit, so the election below sees the latest document
        let row = sqlx::query_as::<Postgres, GalleryRow>(
            "SELECT id, name, created, images, preview FROM galleries WHERE id = $1 FOR UPDATE",
        )
        .bind(gallery_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut gallery = Gallery::from(row);
        let Some(removal) = preview::remove_image(&mut gallery, image_id) else {
            return Ok(None);
        };

        sqlx::query("UPDATE galleries SET images = $2, preview = $3 WHERE id = $1")
            .bind(gallery_id)
            .bind(Json(&gallery.images))
            .bind(gallery.preview)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(removal))
    }

    #[tracing::instrument(skip(self), fields(db.table = "galleries", db.operation = "update", db.record_id = %gallery_id))]
    async fn set_preview(
        &self,
        gallery_id: Uuid,
        image_id: Uuid,
    ) -> Result<Option<Image>, AppError> {
        let images = sqlx::query_scalar::<Postgres, Json<Vec<Image>>>(
            r#"
            UPDATE galleries
            SET preview = $2
            WHERE id = $1
              AND images @> jsonb_build_array(jsonb_build_object('id', $3::text))
            RETURNING images
            "#,
        )
        .bind(gallery_id)
        .bind(image_id)
        .bind(image_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(images.and_then(|Json(images)| images.into_iter().find(|i| i.id == image_id)))
    }

    #[tracing::instrument(skip(self, paths), fields(db.table = "galleries", db.operation = "select", paths = paths.len()))]
    async fn referenced_paths(
        &self,
        paths: &[String],
        excluding: Option<Uuid>,
    ) -> Result<HashSet<String>, AppError> {
        if paths.is_empty() {
            return Ok(HashSet::new());
        }

        let referenced = sqlx::query_scalar::<Postgres, String>(
            r#"
            SELECT DISTINCT e->>'path'
            FROM galleries g, jsonb_array_elements(g.images) AS e
            WHERE ($1::uuid IS NULL OR g.id <> $1)
              AND e->>'path' = ANY($2)
            "#,
        )
        .bind(excluding)
        .bind(paths)
        .fetch_all(&self.pool)
        .await?;

        Ok(referenced.into_iter().collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "galleries", db.operation = "select"))]
    async fn path_in_use(&self, path: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM galleries
                WHERE images @> jsonb_build_array(jsonb_build_object('path', $1::text))
            )
            "#,
        )
        .bind(path)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
