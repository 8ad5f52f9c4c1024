//! Handlers for the `/auth` resource (register, login, protected check).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cinelog_core::error::CoreError;
use cinelog_core::registration::{LoginRequest, RegisterRequest};
use cinelog_core::store::NewUser;
use cinelog_core::types::DbId;
use serde::Serialize;

use super::json_body;
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Plain `{ "message": ... }` body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Response of the protected route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedResponse {
    pub message: &'static str,
    pub user_id: DbId,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid credentials".into()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
///
/// Create an account. The password is stored as an Argon2id hash.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let input = json_body(payload)?;
    input.check(state.config.password_min_length)?;

    if state.store.find_by_email(&input.email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .store
        .create_user(&NewUser {
            name: input.name.trim().to_string(),
            email: input.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully",
        }),
    ))
}

/// POST /auth/login
///
/// Verify email + password and issue a bearer token.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let input = json_body(payload)?;
    input.check()?;

    let user = state
        .store
        .find_by_email(&input.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid_credentials());
    }

    let token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(TokenResponse { token }))
}

/// GET /auth/protected
///
/// Succeeds for any valid bearer token.
pub async fn protected(auth_user: AuthUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "Access granted",
        user_id: auth_user.user_id,
    })
}
