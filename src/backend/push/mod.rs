/**
 * Push Notifications
 *
 * The chat service tells the recipient's devices about a new message through
 * an external push gateway. Delivery is best-effort: callers log failures and
 * carry on.
 *
 * # Gateway Request
 *
 * ```json
 * {
 *   "subscription": { ...opaque handle from the user directory... },
 *   "payload": { "title": "Huddle", "body": "...", "data": { "url": "https://app/chats" } }
 * }
 * ```
 */

use async_trait::async_trait;
use serde::Serialize;

use crate::backend::error::{BackendError, BackendResult};

/// Content of one notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    pub data: PushTarget,
}

/// Where the client should navigate when the notification is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushTarget {
    pub url: String,
}

impl PushNotification {
    /// The "new message" notification
    pub fn new_message(app_name: &str, sender_name: &str, client_url: &str) -> Self {
        Self {
            title: app_name.to_string(),
            body: format!("You have a new message from {}", sender_name),
            data: PushTarget {
                url: format!("{}/chats", client_url.trim_end_matches('/')),
            },
        }
    }
}

#[async_trait]
pub trait PushDispatcher: Send + Sync {
    async fn dispatch(&self, subscription: &serde_json::Value, notification: &PushNotification) -> BackendResult<()>;
}

#[derive(Serialize)]
struct GatewayRequest<'a> {
    subscription: &'a serde_json::Value,
    payload: &'a PushNotification,
}

/// Posts notifications to an HTTP push gateway
#[derive(Clone)]
pub struct HttpPushDispatcher {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpPushDispatcher {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PushDispatcher for HttpPushDispatcher {
    async fn dispatch(&self, subscription: &serde_json::Value, notification: &PushNotification) -> BackendResult<()> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&GatewayRequest {
                subscription,
                payload: notification,
            })
            .send()
            .await
            .map_err(|e| BackendError::upstream("push", e.to_string()))?;

        if !response.status().is_success() {
            return Err(BackendError::upstream(
                "push",
                format!("gateway answered {}", response.status().as_u16()),
            ));
        }
        Ok(())
    }
}

/// Used when no gateway is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPushDispatcher;

#[async_trait]
impl PushDispatcher for NoopPushDispatcher {
    async fn dispatch(&self, _subscription: &serde_json::Value, notification: &PushNotification) -> BackendResult<()> {
        tracing::debug!("[Push] No gateway configured, skipping \"{}\"", notification.body);
        Ok(())
    }
}
