//! Handlers for `/admin/users` (administrators only).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stocker_core::messages::Message;
use stocker_core::types::DbId;
use stocker_db::models::user::UserResponse;
use stocker_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::auth::{create_account, NewAccountRequest};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/v1/admin/users
///
/// Register an account on someone's behalf. The family id is required. No
/// session is created.
pub async fn register_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewAccountRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let user = create_account(&state, &input, true).await?;
    tracing::info!(admin_id = admin.user_id, user_id = user.id, "Admin registered user");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Delete a user with their sessions and owned items. Returns 204.
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(state.text(Message::CannotDeleteSelf)));
    }

    if !UserRepo::delete_with_dependents(&state.pool, id).await? {
        return Err(AppError::NotFound(state.text(Message::UserNotFound)));
    }

    tracing::info!(admin_id = admin.user_id, user_id = id, "Admin deleted user");
    Ok(StatusCode::NO_CONTENT)
}
