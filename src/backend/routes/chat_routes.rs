/**
 * Chat Routes
 *
 * # Routes
 *
 * - `GET /chat` - list conversations (`page`, `limit`, `archived`)
 * - `POST /chat/send` - multipart send
 * - `POST /chat/message` - delete a message for self or for everyone
 * - `POST /chat/message/read` - mark listed messages as read
 * - `GET /chat/unread/total` - unread count over every conversation
 * - `GET /chat/unread/{id}` - unread count of one conversation
 * - `GET /chat/lastMessage/{id}` - last visible message
 * - `PATCH /chat/archive/{id}` - toggle archive for the caller
 * - `PATCH /chat/read/{id}` - mark a whole conversation as read
 * - `GET /chat/{id}` - paged conversation with the user `id`
 * - `DELETE /chat/{id}` - delete the conversation `id` for the caller
 *
 * `GET /chat/{id}` takes a user id and `DELETE /chat/{id}` a chat id. They
 * share the path so the parameter names must match.
 */

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::backend::chat::handlers::{
    conversation_with_user, delete_conversation, delete_message, last_message, list_conversations,
    mark_all_read, mark_read_by_ids, send_message, toggle_archive, unread_for_conversation,
    unread_total,
};
use crate::backend::server::state::AppState;

/// Add the `/chat` routes to the router
pub fn configure_chat_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/chat", get(list_conversations))
        .route("/chat/send", post(send_message))
        .route("/chat/message", post(delete_message))
        .route("/chat/message/read", post(mark_read_by_ids))
        .route("/chat/unread/total", get(unread_total))
        .route("/chat/unread/{id}", get(unread_for_conversation))
        .route("/chat/lastMessage/{id}", get(last_message))
        .route("/chat/archive/{id}", patch(toggle_archive))
        .route("/chat/read/{id}", patch(mark_all_read))
        .route("/chat/{id}", get(conversation_with_user).delete(delete_conversation))
}
