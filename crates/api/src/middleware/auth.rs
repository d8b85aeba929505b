//! Cookie-session authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use stocker_core::error::CoreError;
use stocker_core::messages::Message;
use stocker_core::scope::ItemScope;
use stocker_core::types::DbId;

use crate::auth::session::{get_session, read_session_cookie};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the `session_id` cookie.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub username: String,
    pub group_id: Option<String>,
    pub is_admin: bool,
    /// Stored id (token hash) of the session that authenticated the request.
    pub session_id: String,
}

impl AuthUser {
    /// The items this user may see and change.
    pub fn scope(&self) -> ItemScope {
        ItemScope::for_user(self.user_id, self.group_id.as_deref())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthenticated =
            || AppError::Core(CoreError::Unauthorized(state.text(Message::NotAuthenticated)));

        let token = read_session_cookie(&parts.headers).ok_or_else(unauthenticated)?;

        let (session, user) = get_session(&state.pool, token)
            .await?
            .ok_or_else(unauthenticated)?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
            group_id: user.group_id,
            is_admin: user.is_admin,
            session_id: session.id,
        })
    }
}
