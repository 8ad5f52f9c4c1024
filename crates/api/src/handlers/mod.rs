pub mod auth;
pub mod health;
pub mod movies;
pub mod watchlist;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::{AppError, AppResult};

/// Unwrap a JSON body, turning decode failures into 400 responses.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}
