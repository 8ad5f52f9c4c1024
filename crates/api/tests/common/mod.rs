//! Shared helpers for the HTTP integration tests.
//!
//! Every test builds its own app over a fresh [`MemoryUserStore`], so tests
//! need no database and never share state.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use cinelog_api::auth::jwt::JwtConfig;
use cinelog_api::config::ServerConfig;
use cinelog_api::routes;
use cinelog_api::state::AppState;
use cinelog_core::memory_store::{MemoryMovieStore, MemoryUserStore};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        password_min_length: 6,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expiry_hours: 1,
        },
    }
}

/// Build the full application router over a fresh in-memory user store.
///
/// The store handle is returned so tests can seed data or inject failures.
pub fn build_test_app() -> (Router, Arc<MemoryUserStore>) {
    let (app, users, _movies) = build_test_app_with_movies();
    (app, users)
}

/// Same as [`build_test_app`], also returning the in-memory movie store.
pub fn build_test_app_with_movies() -> (Router, Arc<MemoryUserStore>, Arc<MemoryMovieStore>) {
    let users = Arc::new(MemoryUserStore::new());
    let movies = Arc::new(MemoryMovieStore::new());
    let state = AppState {
        store: users.clone(),
        movies: movies.clone(),
        config: Arc::new(test_config()),
    };
    (routes::build_app(state), users, movies)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header("Authorization", format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder(Method::GET, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(
        app,
        builder(Method::POST, uri, None)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(
        app,
        builder(Method::POST, uri, Some(token))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn send_json_auth(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(
        app,
        builder(method, uri, Some(token))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, builder(Method::DELETE, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder(Method::DELETE, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Register a user through the API and log in, returning the bearer token.
pub async fn register_and_login(app: &Router, email: &str) -> String {
    let password = "test_password_123!";

    let response = post_json(
        app.clone(),
        "/auth/register",
        serde_json::json!({ "name": "Test User", "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        app.clone(),
        "/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    body_json(response).await["token"]
        .as_str()
        .expect("login must return a token")
        .to_string()
}
