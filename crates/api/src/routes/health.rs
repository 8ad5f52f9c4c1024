use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;

/// Unauthenticated root-level routes.
///
/// ```text
/// GET /        -> welcome
/// GET /health  -> health_check
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
}
