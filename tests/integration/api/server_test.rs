//! Health check, fallback and authentication tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::assert_error_body;
use crate::common::TestApp;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let response = app.server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "memory");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new().await;

    let response = app.server.get("/nowhere").await;
    assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_routes_require_a_session() {
    let app = TestApp::new().await;

    let response = app.server.get("/chat").await;
    assert_error_body!(response, StatusCode::UNAUTHORIZED);

    let response = app.server.get("/chat/unread/total").authorization_bearer("garbage").await;
    assert_error_body!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_user_is_rejected() {
    let app = TestApp::new().await;
    let token = huddle::backend::auth::create_token(
        uuid::Uuid::new_v4(),
        crate::common::TEST_SECRET,
        huddle::backend::auth::DEFAULT_TOKEN_TTL,
    )
    .unwrap();

    let response = app.server.get("/chat").authorization_bearer(&token).await;
    assert_error_body!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;

    let response = app
        .server
        .get("/chat/unread/total")
        .add_header("cookie", format!("theme=dark; token={}", alice.token))
        .await;
    response.assert_status_ok();
}
