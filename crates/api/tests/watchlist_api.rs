//! HTTP-level integration tests for the caller's watchlist and profile.

mod common;

use axum::http::StatusCode;
use cinelog_api::auth::jwt::generate_access_token;
use common::{body_json, delete, delete_auth, get, get_auth, post_json, post_json_auth};
use serde_json::json;

async fn upsert(app: &axum::Router, token: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app.clone(), "/api/user/movies", body, token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn list(app: &axum::Router, token: &str) -> serde_json::Value {
    let response = get_auth(app.clone(), "/api/user/movies", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Upsert
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upsert_appends_and_echoes_request_fields_without_media_kind() {
    let (app, _store) = common::build_test_app();
    let token = common::register_and_login(&app, "upsert@test.com").await;

    let echo = upsert(
        &app,
        &token,
        json!({ "externalId": 3, "mediaKind": "movie", "rating": 5, "favorite": true }),
    )
    .await;

    assert_eq!(echo, json!({ "externalId": 3, "rating": 5.0, "favorite": true }));
    assert_eq!(
        list(&app, &token).await,
        json!([{ "externalId": 3, "mediaKind": "movie", "rating": 5.0, "favorite": true }])
    );
}

#[tokio::test]
async fn upsert_echo_omits_fields_not_sent() {
    let (app, _store) = common::build_test_app();
    let token = common::register_and_login(&app, "echo@test.com").await;

    let echo = upsert(&app, &token, json!({ "externalId": "7", "mediaKind": "tv" })).await;

    assert_eq!(echo, json!({ "externalId": 7 }));
    assert_eq!(
        list(&app, &token).await,
        json!([{ "externalId": 7, "mediaKind": "series", "rating": null, "favorite": false }])
    );
}

#[tokio::test]
async fn partial_update_keeps_unsent_fields() {
    let (app, _store) = common::build_test_app();
    let token = common::register_and_login(&app, "partial@test.com").await;

    upsert(
        &app,
        &token,
        json!({ "externalId": 1, "mediaKind": "movie", "rating": 8, "favorite": true }),
    )
    .await;
    upsert(&app, &token, json!({ "externalId": 1, "mediaKind": "movie", "favorite": false })).await;

    let entries = list(&app, &token).await;
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["rating"], 8.0);
    assert_eq!(entries[0]["favorite"], false);
}

#[tokio::test]
async fn null_rating_clears_it() {
    let (app, _store) = common::build_test_app();
    let token = common::register_and_login(&app, "clear@test.com").await;

    upsert(&app, &token, json!({ "externalId": 1, "mediaKind": "movie", "rating": 6 })).await;
    let echo = upsert(&app, &token, json!({ "externalId": 1, "mediaKind": "movie", "rating": null })).await;

    assert_eq!(echo, json!({ "externalId": 1, "rating": null }));
    assert!(list(&app, &token).await[0]["rating"].is_null());
}

#[tokio::test]
async fn same_external_id_with_other_kind_is_a_separate_entry() {
    let (app, _store) = common::build_test_app();
    let token = common::register_and_login(&app, "kinds@test.com").await;

    upsert(&app, &token, json!({ "externalId": 5, "mediaKind": "movie" })).await;
    upsert(&app, &token, json!({ "externalId": 5, "mediaKind": "series" })).await;
    upsert(&app, &token, json!({ "externalId": 5, "mediaKind": "movie", "favorite": true })).await;

    let entries = list(&app, &token).await;
    assert_eq!(entries.as_array().unwrap().len(), 2);
    assert_eq!(entries[0]["mediaKind"], "movie");
    assert_eq!(entries[0]["favorite"], true);
    assert_eq!(entries[1]["mediaKind"], "series");
}

#[tokio::test]
async fn invalid_bodies_return_400_without_writing() {
    let (app, _store) = common::build_test_app();
    let token = common::register_and_login(&app, "invalid@test.com").await;

    let cases = [
        (json!({ "mediaKind": "movie" }), "externalId and mediaKind are both required"),
        (
            json!({ "externalId": 1, "mediaKind": "book" }),
            "Invalid mediaKind. Must be \"movie\" or \"series\".",
        ),
        (
            json!({ "externalId": 1, "mediaKind": "movie", "rating": 11 }),
            "rating must be between 0 and 10",
        ),
        (
            json!({ "externalId": 1e300, "mediaKind": "movie" }),
            "externalId must be an integer",
        ),
    ];

    for (body, message) in cases {
        let response = post_json_auth(app.clone(), "/api/user/movies", body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], message);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    assert_eq!(list(&app, &token).await, json!([]));
}

#[tokio::test]
async fn non_object_body_returns_400() {
    let (app, _store) = common::build_test_app();
    let token = common::register_and_login(&app, "array@test.com").await;

    let response = post_json_auth(app, "/api/user/movies", json!([1, 2, 3]), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn persistence_failure_returns_500() {
    let (app, store) = common::build_test_app();
    let token = common::register_and_login(&app, "fail@test.com").await;
    upsert(&app, &token, json!({ "externalId": 1, "mediaKind": "movie" })).await;

    store.set_fail_writes(true);

    let response = post_json_auth(
        app.clone(),
        "/api/user/movies",
        json!({ "externalId": 2, "mediaKind": "movie" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "An internal error occurred");

    let response = delete_auth(app.clone(), "/api/user/movies/1", &token).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    store.set_fail_writes(false);
    assert_eq!(list(&app, &token).await.as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Remove
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_matches_external_id_only() {
    let (app, _store) = common::build_test_app();
    let token = common::register_and_login(&app, "remove@test.com").await;

    upsert(&app, &token, json!({ "externalId": 1, "mediaKind": "series" })).await;
    upsert(&app, &token, json!({ "externalId": 2, "mediaKind": "movie" })).await;
    upsert(&app, &token, json!({ "externalId": 1, "mediaKind": "movie" })).await;

    let response = delete_auth(app.clone(), "/api/user/movies/1", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Entry removed successfully." })
    );

    // Only the first match (the series) is gone.
    let entries = list(&app, &token).await;
    assert_eq!(
        entries,
        json!([
            { "externalId": 2, "mediaKind": "movie", "rating": null, "favorite": false },
            { "externalId": 1, "mediaKind": "movie", "rating": null, "favorite": false }
        ])
    );
}

#[tokio::test]
async fn remove_missing_entry_returns_404() {
    let (app, _store) = common::build_test_app();
    let token = common::register_and_login(&app, "missing@test.com").await;

    let response = delete_auth(app, "/api/user/movies/999", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn remove_with_non_integer_id_returns_400() {
    let (app, _store) = common::build_test_app();
    let token = common::register_and_login(&app, "badid@test.com").await;

    let response = delete_auth(app, "/api/user/movies/abc", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "externalId must be an integer");
}

// ---------------------------------------------------------------------------
// List and profile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_user_has_empty_list_and_zero_favorites() {
    let (app, _store) = common::build_test_app();
    let token = common::register_and_login(&app, "fresh@test.com").await;

    assert_eq!(list(&app, &token).await, json!([]));

    let response = get_auth(app, "/api/user/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["favoriteCount"], 0);
}

#[tokio::test]
async fn list_keeps_insertion_order() {
    let (app, _store) = common::build_test_app();
    let token = common::register_and_login(&app, "order@test.com").await;

    for id in [30, 10, 20] {
        upsert(&app, &token, json!({ "externalId": id, "mediaKind": "movie" })).await;
    }
    upsert(&app, &token, json!({ "externalId": 10, "mediaKind": "movie", "rating": 3 })).await;

    let ids: Vec<i64> = list(&app, &token)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["externalId"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![30, 10, 20]);
}

#[tokio::test]
async fn profile_reports_summary_without_watchlist() {
    let (app, _store) = common::build_test_app();
    let token = common::register_and_login(&app, "profile@test.com").await;

    upsert(&app, &token, json!({ "externalId": 1, "mediaKind": "movie", "favorite": true })).await;
    upsert(&app, &token, json!({ "externalId": 2, "mediaKind": "series", "favorite": true })).await;
    upsert(&app, &token, json!({ "externalId": 3, "mediaKind": "movie", "favorite": false })).await;

    let response = get_auth(app, "/api/user/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Test User");
    assert_eq!(json["email"], "profile@test.com");
    assert!(json["createdAt"].is_string());
    assert_eq!(json["favoriteCount"], 2);
    assert!(json.get("watchlist").is_none());
    assert!(json.get("password").is_none());
    assert!(json.get("passwordHash").is_none());
}

// ---------------------------------------------------------------------------
// Isolation and auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn users_only_see_their_own_watchlist() {
    let (app, _store) = common::build_test_app();
    let alice = common::register_and_login(&app, "alice@test.com").await;
    let bob = common::register_and_login(&app, "bob@test.com").await;

    upsert(&app, &alice, json!({ "externalId": 1, "mediaKind": "movie" })).await;

    assert_eq!(list(&app, &bob).await, json!([]));
    let response = delete_auth(app.clone(), "/api/user/movies/1", &bob).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(list(&app, &alice).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn every_user_route_requires_a_token() {
    let (app, _store) = common::build_test_app();

    let responses = [
        get(app.clone(), "/api/user/movies").await,
        get(app.clone(), "/api/user/profile").await,
        post_json(
            app.clone(),
            "/api/user/movies",
            json!({ "externalId": 1, "mediaKind": "movie" }),
        )
        .await,
        delete(app.clone(), "/api/user/movies/1").await,
    ];

    for response in responses {
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "No token provided");
    }
}

#[tokio::test]
async fn token_for_deleted_or_unknown_user_returns_404() {
    let (app, _store) = common::build_test_app();
    let token = generate_access_token(4242, &common::test_config().jwt).unwrap();

    let response = get_auth(app.clone(), "/api/user/movies", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, "/api/user/profile", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "User with id 4242 not found");
}
