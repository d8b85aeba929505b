pub mod admin;
pub mod auth;
pub mod health;
pub mod items;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/register                       self sign-up (public, if enabled)
/// /auth/logout                         logout
/// /auth/me                             current user
/// /auth/change-password                change own password
///
/// /items                               list, add
/// /items/view                          stock / shopping view (GET)
/// /items/categories                    category suggestions (GET)
/// /items/{id}                          update, delete
/// /items/{id}/toggle-status            advance status (POST)
/// /items/{id}/toggle-should-buy        flip should-buy (POST)
/// /items/{id}/check                    check off (POST)
///
/// /admin/users                         list, register (admin only)
/// /admin/users/{id}                    delete (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/items", items::router())
        .nest("/admin", admin::router())
}
