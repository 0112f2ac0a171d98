use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use galerie_core::models::{
    CreateGalleryRequest, Gallery, GalleryDetail, GallerySummary, RenameGalleryRequest,
};
use galerie_services::GalleryPreview;
use uuid::Uuid;

use super::{image_response, ViewQuery};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/galleries",
    tag = "galleries",
    responses(
        (status = 200, description = "All galleries, without images", body = Vec<GallerySummary>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_galleries"))]
pub async fn list_galleries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GallerySummary>>, HttpAppError> {
    let galleries = state.galleries.list_galleries().await?;
    Ok(Json(galleries))
}

#[utoipa::path(
    post,
    path = "/api/galleries",
    tag = "galleries",
    request_body = CreateGalleryRequest,
    responses(
        (status = 201, description = "Gallery created", body = Gallery),
        (status = 400, description = "Invalid or reserved name", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "create_gallery"))]
pub async fn create_gallery(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateGalleryRequest>,
) -> Result<(StatusCode, Json<Gallery>), HttpAppError> {
    let gallery = state.galleries.create_gallery(&request.name).await?;
    Ok((StatusCode::CREATED, Json(gallery)))
}

/// Gallery preview image
///
/// Serves the preview image (resized when `width`/`height` are given), the default
/// image when the gallery has no usable preview, or the gallery document with
/// `image=false`.
#[utoipa::path(
    get,
    path = "/api/galleries/{id}",
    tag = "galleries",
    params(
        ("id" = Uuid, Path, description = "Gallery ID"),
        ViewQuery
    ),
    responses(
        (status = 200, description = "Preview bytes, or the gallery document when image=false", body = GalleryDetail),
        (status = 400, description = "Invalid id or size", body = ErrorResponse),
        (status = 404, description = "Gallery not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(gallery_id = %id, operation = "get_gallery_preview"))]
pub async fn get_gallery_preview(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedQuery(query): ValidatedQuery<ViewQuery>,
) -> Result<Response, HttpAppError> {
    let preview = state
        .galleries
        .get_gallery_preview(id, query.into_view())
        .await?;

    Ok(match preview {
        GalleryPreview::Metadata(detail) => Json(detail).into_response(),
        GalleryPreview::Content(content) => image_response(content),
    })
}

#[utoipa::path(
    put,
    path = "/api/galleries/{id}",
    tag = "galleries",
    params(
        ("id" = Uuid, Path, description = "Gallery ID")
    ),
    request_body = RenameGalleryRequest,
    responses(
        (status = 200, description = "Gallery renamed", body = GallerySummary),
        (status = 400, description = "Invalid or reserved name", body = ErrorResponse),
        (status = 404, description = "Gallery not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(gallery_id = %id, operation = "rename_gallery"))]
pub async fn rename_gallery(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(request): ValidatedJson<RenameGalleryRequest>,
) -> Result<Json<GallerySummary>, HttpAppError> {
    let gallery = state.galleries.rename_gallery(id, &request.name).await?;
    Ok(Json(gallery))
}

#[utoipa::path(
    delete,
    path = "/api/galleries/{id}",
    tag = "galleries",
    params(
        ("id" = Uuid, Path, description = "Gallery ID")
    ),
    responses(
        (status = 200, description = "Removed gallery", body = Gallery),
        (status = 404, description = "Gallery not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(gallery_id = %id, operation = "delete_gallery"))]
pub async fn delete_gallery(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<Gallery>, HttpAppError> {
    let gallery = state.galleries.delete_gallery(id).await?;
    Ok(Json(gallery))
}
