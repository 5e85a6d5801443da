//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use axum::http::header::AUTHORIZATION;
use axum_test::{TestRequest, TestServer};
use plaza::config::FeedConfig;
use plaza::web::{create_router, AppState};
use plaza::{Database, TokenService};
use serde_json::{json, Value};
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";
pub const PASSWORD: &str = "password123";

/// Create a test server over a fresh in-memory database.
pub async fn create_test_server() -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let state = Arc::new(AppState::new(
        db.clone(),
        TokenService::new(TEST_SECRET, 3600),
        FeedConfig::default(),
    ));
    let router = create_router(state, &[]);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, db)
}

/// A signed-up account.
pub struct TestUser {
    pub id: i64,
    pub token: String,
}

/// Sign up an account and return its id and token.
pub async fn signup(server: &TestServer, name: &str, email: &str, role: &str) -> TestUser {
    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "confirmPassword": PASSWORD,
            "role": role,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    TestUser {
        id: body["data"]["user"]["id"].as_i64().expect("user id"),
        token: body["data"]["token"].as_str().expect("token").to_string(),
    }
}

/// Attach a bearer credential to a request.
pub fn bearer(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(AUTHORIZATION, format!("Bearer {}", token))
}

/// Create a post and return its id.
pub async fn create_post(server: &TestServer, user: &TestUser, content: &str) -> i64 {
    let response = bearer(server.post("/api/v1/posts"), &user.token)
        .json(&json!({ "content": content }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["data"]["id"]
        .as_i64()
        .expect("post id")
}

/// Create a comment and return its id.
pub async fn create_comment(server: &TestServer, user: &TestUser, post_id: i64, content: &str) -> i64 {
    let response = bearer(server.post("/api/v1/comments"), &user.token)
        .json(&json!({ "postId": post_id, "content": content }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["data"]["id"]
        .as_i64()
        .expect("comment id")
}

/// Create an admin reply and return its id.
pub async fn create_reply(server: &TestServer, admin: &TestUser, post_id: i64, content: &str) -> i64 {
    let response = bearer(server.post("/api/v1/admin/reply"), &admin.token)
        .json(&json!({ "postId": post_id, "content": content }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["data"]["id"]
        .as_i64()
        .expect("reply id")
}
