use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use galerie_core::models::Image;
use galerie_core::AppError;
use galerie_services::{ImageUpload, ImageView};
use uuid::Uuid;

use super::{image_response, ViewQuery};
use crate::error::{ErrorResponse, HttpAppError, ValidatedPath, ValidatedQuery};
use crate::state::AppState;

/// Multipart field carrying the uploaded file
const UPLOAD_FIELD: &str = "image";

#[utoipa::path(
    get,
    path = "/api/galleries/images/{gallery}",
    tag = "images",
    params(
        ("gallery" = String, Path, description = "Gallery name")
    ),
    responses(
        (status = 200, description = "Images in insertion order", body = Vec<Image>),
        (status = 404, description = "Gallery not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_images"))]
pub async fn list_images(
    State(state): State<Arc<AppState>>,
    ValidatedPath(gallery): ValidatedPath<String>,
) -> Result<Json<Vec<Image>>, HttpAppError> {
    let images = state.galleries.list_images(&gallery).await?;
    Ok(Json(images))
}

/// Upload image
///
/// The gallery is looked up before the multipart body is read, so uploads to a
/// missing gallery are rejected without storing anything.
#[utoipa::path(
    post,
    path = "/api/galleries/images/{gallery}",
    tag = "images",
    params(
        ("gallery" = String, Path, description = "Gallery name")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image uploaded", body = Image),
        (status = 400, description = "Invalid filename or body", body = ErrorResponse),
        (status = 404, description = "Gallery not found", body = ErrorResponse),
        (status = 409, description = "Filename already exists", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Not a JPEG or PNG image", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    ValidatedPath(gallery): ValidatedPath<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Image>), HttpAppError> {
    state.galleries.ensure_gallery_exists(&gallery).await?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidInput("Uploaded file has no filename".to_string()))?;
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await?;

        upload = Some(ImageUpload {
            filename,
            content_type,
            data,
        });
        break;
    }

    let upload = upload.ok_or_else(|| {
        AppError::InvalidInput(format!("Missing multipart field '{}'", UPLOAD_FIELD))
    })?;

    let image = state.galleries.upload_image(&gallery, upload).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

#[utoipa::path(
    get,
    path = "/api/galleries/images/{gallery}/{id}",
    tag = "images",
    params(
        ("gallery" = String, Path, description = "Gallery name"),
        ("id" = Uuid, Path, description = "Image ID"),
        ViewQuery
    ),
    responses(
        (status = 200, description = "Image bytes, or the image record when image=false", body = Image),
        (status = 400, description = "Invalid id or size", body = ErrorResponse),
        (status = 404, description = "Gallery or image not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id, operation = "get_image"))]
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    ValidatedPath((gallery, id)): ValidatedPath<(String, Uuid)>,
    ValidatedQuery(query): ValidatedQuery<ViewQuery>,
) -> Result<Response, HttpAppError> {
    let view = state
        .galleries
        .get_image(&gallery, id, query.into_view())
        .await?;

    Ok(match view {
        ImageView::Metadata(image) => Json(image).into_response(),
        ImageView::Content(content) => image_response(content),
    })
}

#[utoipa::path(
    put,
    path = "/api/galleries/images/{gallery}/{id}/preview",
    tag = "images",
    params(
        ("gallery" = String, Path, description = "Gallery name"),
        ("id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "New preview image", body = Image),
        (status = 404, description = "Gallery or image not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id, operation = "set_preview"))]
pub async fn set_preview(
    State(state): State<Arc<AppState>>,
    ValidatedPath((gallery, id)): ValidatedPath<(String, Uuid)>,
) -> Result<Json<Image>, HttpAppError> {
    let image = state.galleries.set_preview(&gallery, id).await?;
    Ok(Json(image))
}

#[utoipa::path(
    delete,
    path = "/api/galleries/images/{gallery}/{id}",
    tag = "images",
    params(
        ("gallery" = String, Path, description = "Gallery name"),
        ("id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Removed image", body = Image),
        (status = 404, description = "Gallery or image not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id, operation = "delete_image"))]
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    ValidatedPath((gallery, id)): ValidatedPath<(String, Uuid)>,
) -> Result<Json<Image>, HttpAppError> {
    let image = state.galleries.delete_image(&gallery, id).await?;
    Ok(Json(image))
}
