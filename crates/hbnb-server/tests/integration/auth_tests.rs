use axum::http::StatusCode;
use chrono::{TimeDelta, Utc};

use hbnb_core::testutil::{TEST_PASSWORD, seed_user};
use hbnb_core::{TokenIssuer, UserStore};

use crate::common::{TEST_SECRET, json_request, request, setup_test_app};

#[tokio::test]
async fn login_returns_access_token() {
    let app = setup_test_app();
    let user = seed_user(app.store.inner(), "host@example.com").await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/v1/login",
            None,
            serde_json::json!({ "email": "host@example.com", "password": TEST_PASSWORD }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    let token = json["access_token"].as_str().unwrap();
    assert_eq!(app.tokens.verify(token).unwrap().sub, user.id);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_get_identical_401() {
    let app = setup_test_app();
    seed_user(app.store.inner(), "host@example.com").await;

    let (wrong_status, wrong_body) = app
        .send(json_request(
            "POST",
            "/api/v1/login",
            None,
            serde_json::json!({ "email": "host@example.com", "password": "guess" }),
        ))
        .await;
    let (unknown_status, unknown_body) = app
        .send(json_request(
            "POST",
            "/api/v1/login",
            None,
            serde_json::json!({ "email": "ghost@example.com", "password": TEST_PASSWORD }),
        ))
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert!(wrong_body.get("access_token").is_none());
}

#[tokio::test]
async fn login_without_fields_returns_401() {
    let app = setup_test_app();

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/v1/login",
            None,
            serde_json::json!({}),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dashboard_returns_current_user() {
    let app = setup_test_app();
    let (user, token) = app.login_as("host@example.com").await;

    let (status, json) = app
        .send(request("GET", "/api/v1/dashboard", Some(&token)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["all"]["id"], user.id.to_string());
    assert_eq!(json["all"]["email"], "host@example.com");
    assert!(json["all"].get("password_hash").is_none());
}

#[tokio::test]
async fn dashboard_for_deleted_user_returns_404() {
    let app = setup_test_app();
    let (user, token) = app.login_as("gone@example.com").await;
    app.store.inner().delete_user(user.id).await.unwrap();

    let (status, json) = app
        .send(request("GET", "/api/v1/dashboard", Some(&token)))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn missing_token_is_rejected_before_storage() {
    let app = setup_test_app();
    let before = app.store.reads();

    let (status, json) = app.send(request("GET", "/api/v1/dashboard", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");
    assert_eq!(app.store.reads(), before);
}

#[tokio::test]
async fn malformed_token_is_rejected_before_storage() {
    let app = setup_test_app();
    let before = app.store.reads();

    let (status, _) = app
        .send(request("GET", "/api/v1/places", Some("not-a-token")))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.reads(), before);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let app = setup_test_app();
    let user = seed_user(app.store.inner(), "host@example.com").await;
    let forged = TokenIssuer::new(b"some-other-secret-value", TimeDelta::minutes(15))
        .issue(user.id)
        .unwrap();

    let (status, _) = app
        .send(request("GET", "/api/v1/dashboard", Some(&forged)))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = setup_test_app();
    let user = seed_user(app.store.inner(), "host@example.com").await;
    let expired = TokenIssuer::new(TEST_SECRET, TimeDelta::minutes(15))
        .issue_at(user.id, Utc::now() - TimeDelta::hours(1))
        .unwrap();

    let (status, json) = app
        .send(request("GET", "/api/v1/dashboard", Some(&expired)))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Token has expired");
}
