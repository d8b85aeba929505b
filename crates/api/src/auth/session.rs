//! Cookie sessions.
//!
//! The browser holds an opaque UUID v4 token in the `session_id` cookie. Only
//! its SHA-256 hex digest is stored, as `sessions.id`. Expiry is checked on
//! every lookup and an expired row is deleted when it is found.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use stocker_core::types::{DbId, Timestamp};
use stocker_db::models::session::{CreateSession, Session};
use stocker_db::models::user::User;
use stocker_db::repositories::{SessionRepo, UserRepo};
use stocker_db::DbPool;
use uuid::Uuid;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";

/// Default session lifetime in days.
const DEFAULT_TTL_DAYS: i64 = 30;

/// Session lifetime and cookie flags.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime in days (default: 30).
    pub ttl_days: i64,
    /// Add the `Secure` attribute to the cookie.
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_days: DEFAULT_TTL_DAYS,
            secure_cookie: false,
        }
    }
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var            | Default |
    /// |--------------------|---------|
    /// | `SESSION_TTL_DAYS` | `30`    |
    ///
    /// The cookie is marked `Secure` when running in production.
    pub fn from_env(production: bool) -> Self {
        let ttl_days: i64 = std::env::var("SESSION_TTL_DAYS")
            .unwrap_or_else(|_| DEFAULT_TTL_DAYS.to_string())
            .parse()
            .expect("SESSION_TTL_DAYS must be a valid i64");
        assert!(ttl_days > 0, "SESSION_TTL_DAYS must be positive");

        Self {
            ttl_days,
            secure_cookie: production,
        }
    }
}

/// Generate a new session token.
///
/// Returns a tuple of `(plaintext_token, sha256_hex_hash)`.
pub fn generate_session_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let hash = hash_session_token(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a session token.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Build the `Set-Cookie` value that stores `token` until `expires_at`.
pub fn session_cookie(token: &str, expires_at: Timestamp, config: &SessionConfig) -> String {
    let max_age = (expires_at - Utc::now()).num_seconds().max(0);
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Expires={}; Max-Age={max_age}",
        expires_at.format("%a, %d %b %Y %H:%M:%S GMT"),
    );
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &SessionConfig) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; \
         Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0"
    );
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Read the session token from the request's `Cookie` headers.
pub fn read_session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Persist a new session for `user_id`.
///
/// Returns the `Set-Cookie` value carrying the plaintext token.
pub async fn create_session(
    pool: &DbPool,
    user_id: DbId,
    config: &SessionConfig,
) -> Result<String, sqlx::Error> {
    let (token, token_hash) = generate_session_token();
    let expires_at = Utc::now() + Duration::days(config.ttl_days);

    SessionRepo::create(
        pool,
        &CreateSession {
            token_hash,
            user_id,
            expires_at,
        },
    )
    .await?;

    tracing::info!(user_id, %expires_at, "Session created");

    Ok(session_cookie(&token, expires_at, config))
}

/// Resolve a session token to its session and user.
///
/// Unknown tokens, expired sessions and sessions of deleted users all yield
/// `None`. An expired session row is deleted here.
pub async fn get_session(
    pool: &DbPool,
    token: &str,
) -> Result<Option<(Session, User)>, sqlx::Error> {
    let token_hash = hash_session_token(token);
    let Some(session) = SessionRepo::find_by_token_hash(pool, &token_hash).await? else {
        return Ok(None);
    };

    if session.is_expired(Utc::now()) {
        SessionRepo::delete(pool, &session.id).await?;
        tracing::debug!(user_id = session.user_id, "Purged expired session");
        return Ok(None);
    }

    let user = UserRepo::find_by_id(pool, session.user_id).await?;
    Ok(user.map(|user| (session, user)))
}

/// Delete the session identified by its token hash.
pub async fn destroy_session(pool: &DbPool, token_hash: &str) -> Result<bool, sqlx::Error> {
    SessionRepo::delete(pool, token_hash).await
}
