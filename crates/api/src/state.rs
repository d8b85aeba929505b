use std::sync::Arc;

use stocker_core::messages::Message;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: stocker_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Render a user-facing message in the configured locale.
    pub fn text(&self, message: Message) -> String {
        message.text(self.config.locale)
    }
}
