use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use hbnb_core::testutil::{CountingStore, TEST_PASSWORD, seed_user};
use hbnb_core::token::DEFAULT_TOKEN_TTL;
use hbnb_core::{MemoryStore, TokenIssuer, User};
use hbnb_server::routes;
use hbnb_server::state::AppState;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub store: CountingStore<MemoryStore>,
    pub tokens: TokenIssuer,
}

/// Build the router over an empty in-memory store.
pub fn setup_test_app() -> TestApp {
    let store = CountingStore::new(MemoryStore::new());
    let tokens = TokenIssuer::new(TEST_SECRET, DEFAULT_TOKEN_TTL);

    let state = Arc::new(AppState {
        store: store.clone(),
        tokens: tokens.clone(),
    });

    TestApp {
        router: routes::router(state),
        store,
        tokens,
    }
}

impl TestApp {
    /// Seed a user and log in through the API, returning the user and a bearer token.
    pub async fn login_as(&self, email: &str) -> (User, String) {
        let user = seed_user(self.store.inner(), email).await;

        let (status, json) = self
            .send(json_request(
                "POST",
                "/api/v1/login",
                None,
                serde_json::json!({ "email": email, "password": TEST_PASSWORD }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);

        let token = json["access_token"].as_str().unwrap().to_string();
        (user, token)
    }

    /// Run a request and decode the JSON body (`Null` when empty).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}
