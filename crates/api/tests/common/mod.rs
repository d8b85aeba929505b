#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use stocker_api::auth::password::hash_password;
use stocker_api::auth::session::SessionConfig;
use stocker_api::config::{AccountPolicy, ServerConfig};
use stocker_api::router::build_app_router;
use stocker_api::state::AppState;
use stocker_core::messages::Locale;
use stocker_db::models::user::{CreateUser, User};
use stocker_db::repositories::UserRepo;

/// Password used for every account created by [`create_user`].
pub const PASSWORD: &str = "correct-horse";

/// Build a test `ServerConfig` with safe defaults.
///
/// Family id is required at login (the production default); sign-up is open
/// so the registration flow can be exercised.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        locale: Locale::En,
        session: SessionConfig::default(),
        accounts: AccountPolicy {
            allow_signup: true,
            ..AccountPolicy::default()
        },
        bootstrap_admin: None,
    }
}

/// Build the full application router over `pool` with [`test_config`].
pub fn build_test_app(pool: SqlitePool) -> Router {
    build_test_app_with(pool, test_config())
}

/// Build the full application router with a custom configuration.
pub fn build_test_app_with(pool: SqlitePool, config: ServerConfig) -> Router {
    build_app_router(AppState {
        pool,
        config: Arc::new(config),
    })
}

/// Insert a user directly, bypassing the API.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    group_id: Option<&str>,
    is_admin: bool,
) -> User {
    let input = CreateUser {
        username: username.to_string(),
        password_hash: hash_password(PASSWORD).expect("hashing should succeed"),
        group_id: group_id.map(str::to_string),
        is_admin,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through the API and return the `session_id=<token>` cookie pair.
pub async fn login(app: &Router, username: &str, group_id: &str) -> String {
    let body = serde_json::json!({
        "username": username,
        "password": PASSWORD,
        "group_id": group_id,
    });
    let response = post_json(app, "/api/v1/auth/login", body, None).await;
    assert_eq!(response.status(), StatusCode::OK, "login of {username} should succeed");
    session_cookie(&response).expect("login must set the session cookie")
}

/// Extract the `session_id=<token>` pair from a `Set-Cookie` response header.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session_id="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    cookie: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    send(app, Method::GET, uri, None, cookie).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response {
    send(app, Method::POST, uri, Some(body), cookie).await
}

pub async fn post_empty(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    send(app, Method::POST, uri, None, cookie).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response {
    send(app, Method::PUT, uri, Some(body), cookie).await
}

pub async fn delete(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    send(app, Method::DELETE, uri, None, cookie).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
