//! Handlers for the caller's personal movie catalog under `/movies`.
//!
//! A movie owned by another user answers 404, same as a missing one.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cinelog_core::movies::{MovieDeleted, MovieInput, MoviePatch, MovieRecord};

use super::json_body;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /movies
pub async fn create_movie(
    auth_user: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<MovieInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MovieRecord>)> {
    let movie = state
        .catalog()
        .create(auth_user.user_id, json_body(payload)?)
        .await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// GET /movies
pub async fn list_movies(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MovieRecord>>> {
    let movies = state.catalog().list(auth_user.user_id).await?;
    Ok(Json(movies))
}

/// GET /movies/{id}
pub async fn get_movie(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieRecord>> {
    let movie = state.catalog().get(auth_user.user_id, &id).await?;
    Ok(Json(movie))
}

/// PUT /movies/{id}
///
/// Full replacement: optional fields left out of the body are cleared.
pub async fn replace_movie(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MovieInput>, JsonRejection>,
) -> AppResult<Json<MovieRecord>> {
    let movie = state
        .catalog()
        .replace(auth_user.user_id, &id, json_body(payload)?)
        .await?;
    Ok(Json(movie))
}

/// PATCH /movies/{id}
pub async fn patch_movie(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MoviePatch>, JsonRejection>,
) -> AppResult<Json<MovieRecord>> {
    let movie = state
        .catalog()
        .patch(auth_user.user_id, &id, json_body(payload)?)
        .await?;
    Ok(Json(movie))
}

/// DELETE /movies/{id}
pub async fn delete_movie(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieDeleted>> {
    let deleted = state.catalog().delete(auth_user.user_id, &id).await?;
    Ok(Json(deleted))
}
