//! Message API integration tests
//!
//! Sending with attachments, deleting messages, read-state.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use pretty_assertions::assert_eq;
use serde_json::json;

use huddle::shared::messaging::{
    ConversationPage, DeleteMessageResponse, LastMessageResponse, MarkReadResponse,
    SendMessageResponse, UnreadCountResponse, UnreadTotalResponse,
};

use crate::assert_error_body;
use crate::common::TestApp;

#[tokio::test]
async fn test_send_creates_conversation_and_counts_unread() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let sent = app.send_text(&alice, &bob, "hello bob").await;
    let sent: SendMessageResponse = serde_json::from_value(sent).unwrap();
    assert_eq!(sent.recipient_id, bob.id);
    assert_eq!(sent.new_message.sender, alice.id);
    assert_eq!(sent.new_message.text, "hello bob");
    assert!(!sent.new_message.is_read);

    let again = app.send_text(&bob, &alice, "hi alice").await;
    assert_eq!(again["chatId"], json!(sent.chat_id));

    let unread: UnreadCountResponse = app
        .server
        .get(&format!("/chat/unread/{}", sent.chat_id))
        .authorization_bearer(&bob.token)
        .await
        .json();
    assert_eq!(unread.unread_count, 1);

    let total: UnreadTotalResponse = app
        .server
        .get("/chat/unread/total")
        .authorization_bearer(&alice.token)
        .await
        .json();
    assert_eq!(total.total_unread_messages, 1);
}

#[tokio::test]
async fn test_send_requires_text_or_media() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let form = MultipartForm::new()
        .add_text("recipientId", bob.id.to_string())
        .add_text("text", "   ");
    let response = app
        .server
        .post("/chat/send")
        .authorization_bearer(&alice.token)
        .multipart(form)
        .await;
    assert_error_body!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_to_self_or_stranger_fails() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;

    let to_self = MultipartForm::new()
        .add_text("recipientId", alice.id.to_string())
        .add_text("text", "me");
    let response = app
        .server
        .post("/chat/send")
        .authorization_bearer(&alice.token)
        .multipart(to_self)
        .await;
    assert_error_body!(response, StatusCode::BAD_REQUEST);

    let to_nobody = MultipartForm::new()
        .add_text("recipientId", uuid::Uuid::new_v4().to_string())
        .add_text("text", "anyone?");
    let response = app
        .server
        .post("/chat/send")
        .authorization_bearer(&alice.token)
        .multipart(to_nobody)
        .await;
    assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attachment_is_stored_and_purged_on_delete_for_everyone() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let form = MultipartForm::new()
        .add_text("recipientId", bob.id.to_string())
        .add_part(
            "files",
            Part::bytes(vec![0x89, b'P', b'N', b'G'])
                .file_name("cat.png")
                .mime_type("image/png"),
        );
    let response = app
        .server
        .post("/chat/send")
        .authorization_bearer(&alice.token)
        .multipart(form)
        .await;
    response.assert_status_ok();
    let sent: SendMessageResponse = response.json();

    assert_eq!(sent.new_message.media.len(), 1);
    let url = &sent.new_message.media[0].url;
    assert!(url.starts_with("http://media.test/media/image/"), "{url}");
    let stored = app
        .media_root
        .path()
        .join(url.trim_start_matches("http://media.test/media/"));
    assert!(stored.exists());

    let response = app
        .server
        .post("/chat/message")
        .authorization_bearer(&alice.token)
        .json(&json!({
            "deleteFor": "Everyone",
            "chatId": sent.chat_id,
            "messageId": sent.new_message.id,
        }))
        .await;
    response.assert_status_ok();
    let deleted: DeleteMessageResponse = response.json();
    assert!(deleted.delete_for_everyone);
    assert_eq!(deleted.recipient_id, Some(bob.id));
    assert!(!stored.exists());

    let last: LastMessageResponse = app
        .server
        .get(&format!("/chat/lastMessage/{}", sent.chat_id))
        .authorization_bearer(&bob.token)
        .await
        .json();
    assert!(last.last_message.is_none());
}

#[tokio::test]
async fn test_unsupported_attachment_type_is_rejected() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let form = MultipartForm::new()
        .add_text("recipientId", bob.id.to_string())
        .add_part(
            "files",
            Part::bytes(b"%PDF".to_vec())
                .file_name("doc.pdf")
                .mime_type("application/pdf"),
        );
    let response = app
        .server
        .post("/chat/send")
        .authorization_bearer(&alice.token)
        .multipart(form)
        .await;
    assert_error_body!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_for_self_hides_only_for_caller() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let sent: SendMessageResponse = serde_json::from_value(app.send_text(&alice, &bob, "oops").await).unwrap();

    let response = app
        .server
        .post("/chat/message")
        .authorization_bearer(&bob.token)
        .json(&json!({
            "deleteFor": "Me",
            "chatId": sent.chat_id,
            "messageId": sent.new_message.id,
        }))
        .await;
    response.assert_status_ok();

    let bob_view: ConversationPage = app
        .server
        .get(&format!("/chat/{}", alice.id))
        .authorization_bearer(&bob.token)
        .await
        .json();
    assert!(bob_view.messages.is_empty());

    let alice_view: ConversationPage = app
        .server
        .get(&format!("/chat/{}", bob.id))
        .authorization_bearer(&alice.token)
        .await
        .json();
    assert_eq!(alice_view.messages.len(), 1);
}

#[tokio::test]
async fn test_only_sender_deletes_for_everyone() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let sent: SendMessageResponse = serde_json::from_value(app.send_text(&alice, &bob, "mine").await).unwrap();

    let response = app
        .server
        .post("/chat/message")
        .authorization_bearer(&bob.token)
        .json(&json!({
            "deleteFor": "Everyone",
            "chatId": sent.chat_id,
            "messageId": sent.new_message.id,
        }))
        .await;
    assert_error_body!(response, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_outsider_cannot_touch_conversation() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;
    let eve = app.user("Eve", "Eavesdrop").await;

    let sent: SendMessageResponse = serde_json::from_value(app.send_text(&alice, &bob, "private").await).unwrap();

    let response = app
        .server
        .get(&format!("/chat/lastMessage/{}", sent.chat_id))
        .authorization_bearer(&eve.token)
        .await;
    assert_error_body!(response, StatusCode::NOT_FOUND);

    let response = app
        .server
        .patch(&format!("/chat/read/{}", sent.chat_id))
        .authorization_bearer(&eve.token)
        .await;
    assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_read_by_ids_and_all() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let first: SendMessageResponse = serde_json::from_value(app.send_text(&alice, &bob, "one").await).unwrap();
    app.send_text(&alice, &bob, "two").await;
    app.send_text(&alice, &bob, "three").await;

    // the sender's own messages never count
    let marked: MarkReadResponse = app
        .server
        .post("/chat/message/read")
        .authorization_bearer(&alice.token)
        .json(&json!({ "chatId": first.chat_id, "messageIds": [first.new_message.id] }))
        .await
        .json();
    assert_eq!(marked.count, 0);

    let marked: MarkReadResponse = app
        .server
        .post("/chat/message/read")
        .authorization_bearer(&bob.token)
        .json(&json!({ "chatId": first.chat_id, "messageIds": [first.new_message.id] }))
        .await
        .json();
    assert_eq!(marked.count, 1);

    let response = app
        .server
        .patch(&format!("/chat/read/{}", first.chat_id))
        .authorization_bearer(&bob.token)
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 2);

    let total: UnreadTotalResponse = app
        .server
        .get("/chat/unread/total")
        .authorization_bearer(&bob.token)
        .await
        .json();
    assert_eq!(total.total_unread_messages, 0);
}

#[tokio::test]
async fn test_mark_read_requires_chat_and_ids() {
    let app = TestApp::new().await;
    let bob = app.user("Bob", "Baker").await;

    let response = app
        .server
        .post("/chat/message/read")
        .authorization_bearer(&bob.token)
        .json(&json!({ "messageIds": [uuid::Uuid::new_v4()] }))
        .await;
    assert_error_body!(response, StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/chat/message/read")
        .authorization_bearer(&bob.token)
        .json(&json!({ "chatId": uuid::Uuid::new_v4(), "messageIds": [] }))
        .await;
    assert_error_body!(response, StatusCode::BAD_REQUEST);
}
