//! Socket tests: room delivery, presence fan-out and client relay

use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestWebSocket;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{TestApp, TestUser};

async fn connect(app: &TestApp, user: &TestUser, query: &str) -> TestWebSocket {
    let socket = app
        .server
        .get_websocket(&format!("/socket{query}"))
        .authorization_bearer(&user.token)
        .await
        .into_websocket()
        .await;
    wait_until_connected(app, user.id).await;
    socket
}

/// The room is joined after the upgrade completes, on the server's task
async fn wait_until_connected(app: &TestApp, user: Uuid) {
    for _ in 0..100 {
        if app.state.hub.is_connected(user) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{user} never joined their room");
}

#[tokio::test]
async fn test_sent_message_reaches_recipient_socket() {
    let app = TestApp::with_http_transport().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let mut bob_socket = connect(&app, &bob, "").await;
    let sent = app.send_text(&alice, &bob, "ping").await;

    let frame: Value = bob_socket.receive_json().await;
    assert_eq!(frame["event"], "newMessage");
    assert_eq!(frame["data"]["chatId"], sent["chatId"]);
    assert_eq!(frame["data"]["newMessage"]["text"], "ping");
}

#[tokio::test]
async fn test_delete_for_everyone_reaches_peer_socket() {
    let app = TestApp::with_http_transport().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let sent = app.send_text(&alice, &bob, "regret").await;
    let mut bob_socket = connect(&app, &bob, "").await;

    app.server
        .post("/chat/message")
        .authorization_bearer(&alice.token)
        .json(&json!({
            "deleteFor": "Everyone",
            "chatId": sent["chatId"],
            "messageId": sent["newMessage"]["id"],
        }))
        .await
        .assert_status_ok();

    let frame: Value = bob_socket.receive_json().await;
    assert_eq!(frame["event"], "messageDeleted");
    assert_eq!(frame["data"]["deletedMessageId"], sent["newMessage"]["id"]);
    assert_eq!(frame["data"]["chatId"], sent["chatId"]);
}

#[tokio::test]
async fn test_friends_see_online_and_offline() {
    let app = TestApp::with_http_transport().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;
    app.befriend(&alice, &bob).await;

    let mut alice_socket = connect(&app, &alice, "").await;
    let bob_socket = connect(&app, &bob, &format!("?userId={}&name=Bob%20Baker", bob.id)).await;

    let online: Value = alice_socket.receive_json().await;
    assert_eq!(online["event"], "friend-online-status");
    assert_eq!(online["data"]["userId"], json!(bob.id));
    assert_eq!(online["data"]["isOnline"], true);
    assert_eq!(online["data"]["name"], "Bob Baker");

    bob_socket.close().await;

    let offline: Value = alice_socket.receive_json().await;
    assert_eq!(offline["event"], "friend-online-status");
    assert_eq!(offline["data"]["isOnline"], false);
    assert!(offline["data"]["lastSeen"].is_string());
    assert!(offline["data"].get("name").is_none());

    let stored = app.state.presence.presence_of(bob.id).await.unwrap().unwrap();
    assert!(!stored.is_online);
}

#[tokio::test]
async fn test_client_frames_are_relayed_to_target() {
    let app = TestApp::with_http_transport().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let mut alice_socket = connect(&app, &alice, "").await;
    let mut bob_socket = connect(&app, &bob, "").await;

    alice_socket
        .send_json(&json!({
            "event": "newMessage",
            "data": { "targetUserId": bob.id, "text": "optimistic" }
        }))
        .await;

    let frame: Value = bob_socket.receive_json().await;
    assert_eq!(frame["event"], "newMessage");
    assert_eq!(frame["data"]["text"], "optimistic");
}

#[tokio::test]
async fn test_socket_rejects_mismatched_user_id() {
    let app = TestApp::with_http_transport().await;
    let alice = app.user("Alice", "Archer").await;

    let response = app
        .server
        .get_websocket(&format!("/socket?userId={}", Uuid::new_v4()))
        .authorization_bearer(&alice.token)
        .expect_failure()
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}
