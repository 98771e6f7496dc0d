use axum::body::Body;
use axum::http::{Request, StatusCode};

use crate::common::{json_request, request, setup_test_app};

#[tokio::test]
async fn status_returns_200() {
    let app = setup_test_app();

    let (status, json) = app.send(request("GET", "/api/v1/status", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
    assert_eq!(json["storage"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app();

    let (status, json) = app
        .send(request("GET", "/api-docs/openapi.json", None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["info"]["title"], "HBnB API");
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_then_login() {
    let app = setup_test_app();

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/v1/users",
            None,
            serde_json::json!({
                "email": "new@example.com",
                "password": "s3cret-pass",
                "first_name": "Ada",
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["email"], "new@example.com");
    assert_eq!(json["first_name"], "Ada");
    assert!(json.get("password_hash").is_none());

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/v1/login",
            None,
            serde_json::json!({ "email": "new@example.com", "password": "s3cret-pass" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["access_token"].is_string());
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let app = setup_test_app();
    app.login_as("taken@example.com").await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/v1/users",
            None,
            serde_json::json!({ "email": "taken@example.com", "password": "pw" }),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn register_rejects_missing_fields() {
    let app = setup_test_app();

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/v1/users",
            None,
            serde_json::json!({ "email": "a@example.com" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Missing password");

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/v1/users",
            None,
            serde_json::json!({ "password": "pw" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Missing email");
}

#[tokio::test]
async fn invalid_json_returns_400() {
    let app = setup_test_app();

    let (status, json) = app
        .send(
            Request::post("/api/v1/users")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn get_list_and_delete_user() {
    let app = setup_test_app();
    let (user, token) = app.login_as("host@example.com").await;
    let other = hbnb_core::testutil::seed_user(app.store.inner(), "guest@example.com").await;

    let (status, json) = app
        .send(request("GET", "/api/v1/users", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);

    let (status, json) = app
        .send(request(
            "GET",
            &format!("/api/v1/users/{}", user.id),
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], "host@example.com");

    let uri = format!("/api/v1/users/{}", other.id);
    let (status, json) = app.send(request("DELETE", &uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({}));

    let (status, _) = app.send(request("GET", &uri, Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(request("DELETE", &uri, Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Amenities
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_get_and_delete_amenity() {
    let app = setup_test_app();
    let (_, token) = app.login_as("host@example.com").await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/v1/amenities",
            Some(&token),
            serde_json::json!({ "name": "Hot tub" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], "Hot tub");
    let amenity_id = json["id"].as_str().unwrap().to_string();

    let (status, json) = app
        .send(request("GET", "/api/v1/amenities", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["id"], amenity_id);

    let uri = format!("/api/v1/amenities/{amenity_id}");
    let (status, json) = app.send(request("GET", &uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Hot tub");

    let (status, _) = app.send(request("DELETE", &uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(request("GET", &uri, Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_amenity_requires_name() {
    let app = setup_test_app();
    let (_, token) = app.login_as("host@example.com").await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/v1/amenities",
            Some(&token),
            serde_json::json!({ "name": "  " }),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Missing name");
}

#[tokio::test]
async fn over_long_fields_return_400() {
    let app = setup_test_app();
    let (_, token) = app.login_as("host@example.com").await;
    let long = "x".repeat(200);

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/v1/amenities",
            Some(&token),
            serde_json::json!({ "name": long }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "name must be at most 128 characters");

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/v1/places",
            Some(&token),
            serde_json::json!({ "name": "Loft", "description": "d".repeat(2000) }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/v1/users",
            None,
            serde_json::json!({ "email": format!("{long}@example.com"), "password": "pw" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_amenity_requires_token() {
    let app = setup_test_app();

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/v1/amenities",
            None,
            serde_json::json!({ "name": "Sauna" }),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Places
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_place_is_owned_by_caller() {
    let app = setup_test_app();
    let (user, token) = app.login_as("host@example.com").await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/v1/places",
            Some(&token),
            serde_json::json!({
                "name": "Seaside cabin",
                "number_rooms": 3,
                "price_by_night": 120,
                "latitude": 43.7,
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["user_id"], user.id.to_string());
    assert_eq!(json["number_rooms"], 3);
    assert_eq!(json["number_bathrooms"], 0);
    let place_id = json["id"].as_str().unwrap().to_string();

    let (status, json) = app
        .send(request(
            "GET",
            &format!("/api/v1/places/{place_id}"),
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Seaside cabin");

    let (status, json) = app
        .send(request("GET", "/api/v1/places", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_place_requires_name() {
    let app = setup_test_app();
    let (_, token) = app.login_as("host@example.com").await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/v1/places",
            Some(&token),
            serde_json::json!({ "number_rooms": 2 }),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Missing name");
}

#[tokio::test]
async fn unknown_place_returns_404() {
    let app = setup_test_app();
    let (_, token) = app.login_as("host@example.com").await;

    let (status, _) = app
        .send(request("GET", "/api/v1/places/not-a-uuid", Some(&token)))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
