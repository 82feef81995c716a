/**
 * Session Tokens
 *
 * Sessions are HS256 JWTs whose `sub` claim is the user id. Tokens are issued
 * by the platform's auth service; this crate only verifies them (and issues
 * them in tests and dev tooling).
 */

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::SharedError;

/// Lifetime of tokens issued by [`create_token`] when the caller has no preference
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

fn now_secs() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Create a signed token for a user
pub fn create_token(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, jsonwebtoken::errors::Error> {
    let now = now_secs();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + ttl.as_secs(),
        iat: now,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

/// Verify signature and expiry and return the claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())?;
    Ok(data.claims)
}

/// Verify a token and return the user id it was issued for
pub fn user_id_from_token(token: &str, secret: &str) -> Result<Uuid, SharedError> {
    let claims = verify_token(token, secret)
        .map_err(|e| SharedError::unauthorized(format!("Invalid session: {}", e)))?;
    Uuid::parse_str(&claims.sub).map_err(|_| SharedError::unauthorized("Invalid user ID in session"))
}
