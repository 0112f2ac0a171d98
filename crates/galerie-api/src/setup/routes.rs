//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::handlers::{galleries, health, images};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, put},
    Router,
};
use galerie_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = config.max_file_size_bytes() + MULTIPART_OVERHEAD_BYTES;

    let app = gallery_routes()
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api/openapi.json", ApiDoc::openapi()).path("/docs"))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn gallery_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/galleries",
            get(galleries::list_galleries).post(galleries::create_gallery),
        )
        .route(
            "/api/galleries/{id}",
            get(galleries::get_gallery_preview)
                .put(galleries::rename_gallery)
                .delete(galleries::delete_gallery),
        )
        .route(
            "/api/galleries/images/{gallery}",
            get(images::list_images).post(images::upload_image),
        )
        .route(
            "/api/galleries/images/{gallery}/{id}",
            get(images::get_image).delete(images::delete_image),
        )
        .route(
            "/api/galleries/images/{gallery}/{id}/preview",
            put(images::set_preview),
        )
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
