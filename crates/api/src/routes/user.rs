//! Route definitions for the caller's watchlist and profile.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::watchlist;
use crate::state::AppState;

/// Routes mounted at `/api/user`. All require auth.
///
/// ```text
/// GET    /movies                -> list_entries
/// POST   /movies                -> upsert_entry
/// DELETE /movies/{external_id}  -> remove_entry
/// GET    /profile               -> profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/movies",
            get(watchlist::list_entries).post(watchlist::upsert_entry),
        )
        .route("/movies/{external_id}", delete(watchlist::remove_entry))
        .route("/profile", get(watchlist::profile))
}
