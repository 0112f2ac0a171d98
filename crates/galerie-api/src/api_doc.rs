//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use galerie_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Galerie API",
        version = "0.1.0",
        description = "Photo gallery management: galleries of JPEG/PNG images with EXIF metadata, an automatically maintained preview image, and on-demand thumbnails."
    ),
    paths(
        // Galleries
        handlers::galleries::list_galleries,
        handlers::galleries::create_gallery,
        handlers::galleries::get_gallery_preview,
        handlers::galleries::rename_gallery,
        handlers::galleries::delete_gallery,
        // Images
        handlers::images::list_images,
        handlers::images::upload_image,
        handlers::images::get_image,
        handlers::images::set_preview,
        handlers::images::delete_image,
        // Health
        handlers::health::health_check,
        handlers::health::liveness_check,
    ),
    components(
        schemas(
            models::Gallery,
            models::GallerySummary,
            models::GalleryDetail,
            models::Image,
            models::CreateGalleryRequest,
            models::RenameGalleryRequest,
            handlers::health::HealthCheckResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "galleries", description = "Gallery lifecycle and preview images"),
        (name = "images", description = "Image upload, retrieval and deletion"),
        (name = "health", description = "Liveness and dependency health")
    )
)]
pub struct ApiDoc;
