//! Route definitions for the `/items` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::items;
use crate::state::AppState;

/// Routes mounted at `/items`. All require auth.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list_items).post(items::add_item))
        .route("/view", get(items::item_view))
        .route("/categories", get(items::category_suggestions))
        .route("/{id}", put(items::update_item).delete(items::delete_item))
        .route("/{id}/toggle-status", post(items::toggle_status))
        .route("/{id}/toggle-should-buy", post(items::toggle_should_buy))
        .route("/{id}/check", post(items::check_item))
}
