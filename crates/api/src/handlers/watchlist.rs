//! Handlers for the caller's watchlist and profile under `/api/user`.
//!
//! All routes require a bearer token; the caller can only reach their own
//! record.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use cinelog_core::engine::{ProfileSummary, RemoveConfirmation};
use cinelog_core::watchlist::{UpsertEcho, UpsertEntryRequest, WatchlistEntry};
use serde_json::Value;

use super::json_body;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/user/movies
///
/// Create or update the entry keyed by `(externalId, mediaKind)`. The body
/// echoes the request fields, not the stored entry.
pub async fn upsert_entry(
    auth_user: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<UpsertEcho>> {
    let request = UpsertEntryRequest::from_json(json_body(payload)?)?;
    let echo = state.watchlist().upsert(auth_user.user_id, &request).await?;
    Ok(Json(echo))
}

/// DELETE /api/user/movies/{external_id}
///
/// Remove the first entry with this `externalId`, whatever its media kind.
pub async fn remove_entry(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> AppResult<Json<RemoveConfirmation>> {
    let confirmation = state
        .watchlist()
        .remove(auth_user.user_id, &external_id)
        .await?;
    Ok(Json(confirmation))
}

/// GET /api/user/movies
pub async fn list_entries(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<WatchlistEntry>>> {
    let entries = state.watchlist().list(auth_user.user_id).await?;
    Ok(Json(entries))
}

/// GET /api/user/profile
pub async fn profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ProfileSummary>> {
    let summary = state.watchlist().profile(auth_user.user_id).await?;
    Ok(Json(summary))
}
