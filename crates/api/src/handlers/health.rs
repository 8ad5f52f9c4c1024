//! Unauthenticated service endpoints: welcome, health, and the 404 fallback.

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /
pub async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Ready to browse!" }))
}

/// GET /health
///
/// Always 200; `dbHealthy` reports whether the store answered.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match state.store.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Fallback for unmatched routes.
pub async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    tracing::debug!(%method, %uri, "Route not found");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found", "code": "NOT_FOUND" })),
    )
}
