//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require an administrator.
///
/// ```text
/// GET    /users       -> list_users
/// POST   /users       -> register_user
/// DELETE /users/{id}  -> delete_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::register_user))
        .route("/users/{id}", delete(admin::delete_user))
}
