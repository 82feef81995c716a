/**
 * Authentication Middleware
 *
 * Protects every chat route and the socket upgrade. The session token is
 * read from the `token` cookie (what browsers send, including on WebSocket
 * upgrades) or from an `Authorization: Bearer` header, verified, and the
 * user is looked up in the directory before the request goes on.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::user_id_from_token;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::SharedError;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "token";

/// Authenticated user data extracted from the session token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Find the session token: the `token` cookie first, then a Bearer header
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string());

    from_cookie.filter(|token| !token.is_empty()).or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
    })
}

/// Authentication middleware
///
/// Returns 401 with the usual JSON error body if the token is missing,
/// invalid, expired, or names a user the directory does not know.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = session_token(request.headers()).ok_or_else(|| {
        tracing::debug!("[Auth] No session token on {}", request.uri().path());
        SharedError::unauthorized("Please log in to continue")
    })?;

    let user_id = user_id_from_token(&token, &app_state.config.jwt_secret).map_err(|e| {
        tracing::warn!("[Auth] {}", e);
        e
    })?;

    if app_state.users.find_user(user_id).await?.is_none() {
        tracing::warn!("[Auth] Token for unknown user {}", user_id);
        return Err(SharedError::unauthorized("User no longer exists").into());
    }

    request.extensions_mut().insert(AuthenticatedUser { user_id });
    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid behind `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.user_id
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("[Auth] AuthenticatedUser not found in request extensions");
                SharedError::unauthorized("Please log in to continue")
            })?;
        Ok(AuthUser(user))
    }
}
