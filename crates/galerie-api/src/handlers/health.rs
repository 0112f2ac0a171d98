//! Health check handlers and response types.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub document_store: String,
    pub storage: String,
    /// Background file removals still running
    pub pending_removals: usize,
}

/// Liveness check: process is running.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Health check: document store and artifact store.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "All dependencies healthy", body = HealthCheckResponse),
        (status = 503, description = "Document store unavailable", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.clone();
    let document_store = run_check(CHECK_TIMEOUT, async move { store.ping().await }, "unhealthy").await;

    let storage = state.storage.clone();
    let storage_status = run_check(
        CHECK_TIMEOUT,
        async move {
            storage
                .exists("health-check-non-existent-key")
                .await
                .map(drop)
        },
        "degraded",
    )
    .await;

    let overall_healthy = document_store == "healthy";
    if !overall_healthy {
        tracing::error!(document_store = %document_store, "Health check failed");
    }

    let response = HealthCheckResponse {
        status: if overall_healthy { "healthy" } else { "unhealthy" }.to_string(),
        document_store,
        storage: storage_status,
        pending_removals: state.galleries.reaper().pending(),
    };

    let status_code = if overall_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_check_outcomes() {
        let ok = run_check(Duration::from_secs(1), async { Ok::<(), String>(()) }, "bad").await;
        assert_eq!(ok, "healthy");

        let failed = run_check(
            Duration::from_secs(1),
            async { Err::<(), _>("refused".to_string()) },
            "unhealthy",
        )
        .await;
        assert_eq!(failed, "unhealthy: refused");

        let slow = run_check(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<(), String>(())
            },
            "bad",
        )
        .await;
        assert_eq!(slow, "timeout");
    }
}
