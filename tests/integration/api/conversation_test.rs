//! Conversation API integration tests
//!
//! Listing, paging, archiving and deleting whole conversations.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use huddle::shared::messaging::{
    ConversationPage, DeleteConversationResponse, ListConversationsResponse, SendMessageResponse,
    ToggleArchiveResponse,
};

use crate::assert_error_body;
use crate::common::{TestApp, TestUser};

async fn list(app: &TestApp, user: &TestUser, query: &str) -> ListConversationsResponse {
    let response = app
        .server
        .get(&format!("/chat{query}"))
        .authorization_bearer(&user.token)
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn test_list_is_newest_first_with_peer_summary() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;
    let carol = app.user("Carol", "Cooper").await;

    app.send_text(&alice, &bob, "to bob").await;
    app.send_text(&carol, &alice, "to alice").await;

    let listed = list(&app, &alice, "").await;
    assert_eq!(listed.chats.len(), 2);
    assert_eq!(listed.chats[0].participants[0].id, carol.id);
    assert_eq!(listed.chats[0].participants[0].first_name.as_deref(), Some("Carol"));
    assert_eq!(listed.chats[0].last_message.as_ref().map(|m| m.text.as_str()), Some("to alice"));
    assert_eq!(listed.chats[1].participants[0].id, bob.id);
    assert_eq!(listed.page, 1);
    assert_eq!(listed.total_pages, 1);
    assert!(!listed.has_next_page);

    let paged = list(&app, &alice, "?page=1&limit=1").await;
    assert_eq!(paged.chats.len(), 1);
    assert_eq!(paged.total_pages, 2);
    assert!(paged.has_next_page);
}

#[tokio::test]
async fn test_history_pages_from_the_newest_end() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    for n in 0..5 {
        app.send_text(&alice, &bob, &format!("m{n}")).await;
    }

    let newest: ConversationPage = app
        .server
        .get(&format!("/chat/{}?page=1&limit=2", bob.id))
        .authorization_bearer(&alice.token)
        .await
        .json();
    let texts: Vec<_> = newest.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["m3", "m4"]);
    assert!(newest.has_more);

    let oldest: ConversationPage = app
        .server
        .get(&format!("/chat/{}?page=3&limit=2", bob.id))
        .authorization_bearer(&alice.token)
        .await
        .json();
    let texts: Vec<_> = oldest.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["m0"]);
    assert!(!oldest.has_more);
}

#[tokio::test]
async fn test_opening_unknown_peer_fails() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;

    let response = app
        .server
        .get(&format!("/chat/{}", uuid::Uuid::new_v4()))
        .authorization_bearer(&alice.token)
        .await;
    assert_error_body!(response, StatusCode::NOT_FOUND);

    let response = app
        .server
        .get(&format!("/chat/{}", alice.id))
        .authorization_bearer(&alice.token)
        .await;
    assert_error_body!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_archive_toggles_per_user() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let sent: SendMessageResponse = serde_json::from_value(app.send_text(&alice, &bob, "hi").await).unwrap();

    let toggled: ToggleArchiveResponse = app
        .server
        .patch(&format!("/chat/archive/{}", sent.chat_id))
        .authorization_bearer(&alice.token)
        .json(&json!({ "recipientId": bob.id }))
        .await
        .json();
    assert!(toggled.archived);
    assert_eq!(toggled.recipient_id, Some(bob.id));

    assert!(list(&app, &alice, "").await.chats.is_empty());
    assert_eq!(list(&app, &alice, "?archive=true").await.chats.len(), 1);
    assert_eq!(list(&app, &bob, "").await.chats.len(), 1);

    let toggled: ToggleArchiveResponse = app
        .server
        .patch(&format!("/chat/archive/{}", sent.chat_id))
        .authorization_bearer(&alice.token)
        .await
        .json();
    assert!(!toggled.archived);
    assert_eq!(list(&app, &alice, "").await.chats.len(), 1);
}

#[tokio::test]
async fn test_malformed_archive_body_is_rejected() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let sent: SendMessageResponse = serde_json::from_value(app.send_text(&alice, &bob, "hi").await).unwrap();

    let response = app
        .server
        .patch(&format!("/chat/archive/{}", sent.chat_id))
        .authorization_bearer(&alice.token)
        .text("{\"recipientId\": ")
        .await;
    assert_error_body!(response, StatusCode::BAD_REQUEST);

    // nothing was toggled
    assert_eq!(list(&app, &alice, "").await.chats.len(), 1);
}

#[tokio::test]
async fn test_archive_and_delete_bump_the_conversation_to_the_top() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;
    let carol = app.user("Carol", "Cooper").await;

    let from_alice: SendMessageResponse =
        serde_json::from_value(app.send_text(&alice, &bob, "older").await).unwrap();
    let from_carol: SendMessageResponse =
        serde_json::from_value(app.send_text(&carol, &bob, "newer").await).unwrap();

    let order = |listed: ListConversationsResponse| -> Vec<_> {
        listed.chats.iter().map(|c| c.participants[0].id).collect()
    };
    assert_eq!(order(list(&app, &bob, "").await), vec![carol.id, alice.id]);

    app.server
        .patch(&format!("/chat/archive/{}", from_alice.chat_id))
        .authorization_bearer(&alice.token)
        .await
        .assert_status_ok();
    assert_eq!(order(list(&app, &bob, "").await), vec![alice.id, carol.id]);

    app.server
        .post("/chat/message")
        .authorization_bearer(&carol.token)
        .json(&json!({
            "deleteFor": "Me",
            "chatId": from_carol.chat_id,
            "messageId": from_carol.new_message.id,
        }))
        .await
        .assert_status_ok();
    assert_eq!(order(list(&app, &bob, "").await), vec![carol.id, alice.id]);
}

#[tokio::test]
async fn test_delete_conversation_is_permanent_once_both_sides_delete() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let sent: SendMessageResponse = serde_json::from_value(app.send_text(&alice, &bob, "bye").await).unwrap();

    let first: DeleteConversationResponse = app
        .server
        .delete(&format!("/chat/{}", sent.chat_id))
        .authorization_bearer(&alice.token)
        .await
        .json();
    assert!(!first.permanent);
    assert_eq!(first.message, "Chat deleted for you");
    assert!(list(&app, &alice, "").await.chats.is_empty());
    assert_eq!(list(&app, &bob, "").await.chats.len(), 1);

    let second: DeleteConversationResponse = app
        .server
        .delete(&format!("/chat/{}", sent.chat_id))
        .authorization_bearer(&bob.token)
        .await
        .json();
    assert!(second.permanent);

    let response = app
        .server
        .get(&format!("/chat/unread/{}", sent.chat_id))
        .authorization_bearer(&bob.token)
        .await;
    assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_new_message_restores_deleted_conversation_for_recipient() {
    let app = TestApp::new().await;
    let alice = app.user("Alice", "Archer").await;
    let bob = app.user("Bob", "Baker").await;

    let sent: SendMessageResponse = serde_json::from_value(app.send_text(&alice, &bob, "first").await).unwrap();
    app.server
        .delete(&format!("/chat/{}", sent.chat_id))
        .authorization_bearer(&bob.token)
        .await
        .assert_status_ok();
    assert!(list(&app, &bob, "").await.chats.is_empty());

    app.send_text(&alice, &bob, "second").await;

    let listed = list(&app, &bob, "").await;
    assert_eq!(listed.chats.len(), 1);
    // the earlier message stays hidden for bob
    let page: ConversationPage = app
        .server
        .get(&format!("/chat/{}", alice.id))
        .authorization_bearer(&bob.token)
        .await
        .json();
    let texts: Vec<_> = page.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["second"]);
}
