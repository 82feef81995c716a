//! In-memory test app
//!
//! Builds the real router over in-memory stores and a temporary media root.
//! Users and friendships are seeded straight into the memory directory.

use axum_test::TestServer;
use tempfile::TempDir;
use uuid::Uuid;

use huddle::backend::auth::{create_token, DEFAULT_TOKEN_TTL};
use huddle::backend::directory::{MemoryFriendGraph, MemoryUserDirectory};
use huddle::backend::routes::create_router;
use huddle::backend::server::{build_state, AppState, Stores};
use huddle::shared::messaging::{FriendEdge, UserProfile};
use huddle::shared::AppConfig;

pub const TEST_SECRET: &str = "integration-test-secret";

/// A seeded user and their session token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub users: MemoryUserDirectory,
    pub friends: MemoryFriendGraph,
    pub media_root: TempDir,
}

impl TestApp {
    /// App served through axum-test's mock transport
    pub async fn new() -> Self {
        Self::build(false).await
    }

    /// App on a real socket, needed for WebSocket tests
    pub async fn with_http_transport() -> Self {
        Self::build(true).await
    }

    async fn build(http: bool) -> Self {
        let media_root = tempfile::tempdir().expect("temp media root");
        let config = AppConfig::builder()
            .jwt_secret(TEST_SECRET)
            .media_root(media_root.path())
            .media_public_url("http://media.test/media")
            .client_url("http://client.test")
            .build()
            .expect("test config");

        let users = MemoryUserDirectory::new();
        let friends = MemoryFriendGraph::new();
        let state = build_state(config, Stores::memory(users.clone(), friends.clone()), None)
            .await
            .expect("test state");

        let router = create_router(state.clone());
        let server = if http {
            TestServer::builder().http_transport().build(router)
        } else {
            TestServer::new(router)
        }
        .expect("test server");

        Self {
            server,
            state,
            users,
            friends,
            media_root,
        }
    }

    /// Seed a user and issue a token for them
    pub async fn user(&self, first_name: &str, last_name: &str) -> TestUser {
        let id = Uuid::new_v4();
        self.users.insert(UserProfile::new(id, first_name, last_name)).await;
        TestUser {
            id,
            token: create_token(id, TEST_SECRET, DEFAULT_TOKEN_TTL).expect("test token"),
        }
    }

    pub async fn befriend(&self, a: &TestUser, b: &TestUser) {
        self.friends.add_edge(FriendEdge::accepted(a.id, b.id)).await;
    }

    /// Send a text message through the HTTP API and return the response body
    pub async fn send_text(&self, from: &TestUser, to: &TestUser, text: &str) -> serde_json::Value {
        use axum_test::multipart::MultipartForm;

        let form = MultipartForm::new()
            .add_text("recipientId", to.id.to_string())
            .add_text("text", text.to_string());
        let response = self
            .server
            .post("/chat/send")
            .authorization_bearer(&from.token)
            .multipart(form)
            .await;
        response.assert_status_ok();
        response.json()
    }
}
