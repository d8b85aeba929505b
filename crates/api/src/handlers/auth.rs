//! Handlers for the `/auth` resource (login, register, logout, me,
//! change-password).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use stocker_core::error::CoreError;
use stocker_core::limits::{MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH};
use stocker_core::messages::Message;
use stocker_db::models::user::{CreateUser, User, UserResponse};
use stocker_db::repositories::{SessionRepo, UserRepo};
use validator::{Validate, ValidationError};

use crate::auth::password::{hash_password, meets_min_length, verify_password};
use crate::auth::session::{
    clear_session_cookie, create_session, destroy_session, hash_session_token,
    read_session_cookie,
};
use crate::error::{AppError, AppResult};
use crate::extract::{trimmed, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Family id; required when the server enforces it.
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Request body for `POST /auth/register` and `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct NewAccountRequest {
    /// Stored trimmed; the length bounds apply to the trimmed name.
    #[validate(custom(function = "username_length"))]
    pub username: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH))]
    pub password: String,
    /// Family id. Always required from an admin; required at sign-up when
    /// login checks it.
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Check the trimmed username against the length bounds.
fn username_length(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count() as u64;
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(ValidationError::new("length"));
    }
    Ok(())
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with username + password (+ family id). Sets the session
/// cookie and returns the user.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid_credentials =
        || AppError::Core(CoreError::Unauthorized(state.text(Message::InvalidCredentials)));

    let username = input.username.trim();
    let user = UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(username, "Login rejected: bad password");
        return Err(invalid_credentials());
    }

    if state.config.accounts.require_group_on_login {
        let Some(group_id) = trimmed(input.group_id.as_deref()) else {
            return Err(AppError::Core(CoreError::Validation(
                state.text(Message::FamilyIdRequired),
            )));
        };
        if user.group_id.as_deref() != Some(group_id.as_str()) {
            tracing::info!(user_id = user.id, "Login rejected: family id mismatch");
            return Err(AppError::Core(CoreError::Unauthorized(
                state.text(Message::FamilyIdMismatch),
            )));
        }
    }

    let cookie = create_session(&state.pool, user.id, &state.config.session).await?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        [(SET_COOKIE, cookie)],
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// POST /api/v1/auth/register
///
/// Self-service sign-up, when enabled. Logs the new user in. Returns 201.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewAccountRequest>,
) -> AppResult<impl IntoResponse> {
    if !state.config.accounts.allow_signup {
        return Err(AppError::Core(CoreError::Forbidden(
            state.text(Message::SignupDisabled),
        )));
    }

    let require_group = state.config.accounts.require_group_on_login;
    let user = create_account(&state, &input, require_group).await?;
    let cookie = create_session(&state.pool, user.id, &state.config.session).await?;

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Delete the current session (if any) and clear the cookie. Returns 204.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<impl IntoResponse> {
    if let Some(token) = read_session_cookie(&headers) {
        let removed = destroy_session(&state.pool, &hash_session_token(token)).await?;
        tracing::info!(removed, "User logged out");
    }

    Ok((
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_session_cookie(&state.config.session))],
    ))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(state.text(Message::NotAuthenticated)))
        })?;

    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// POST /api/v1/auth/change-password
///
/// Replace the caller's password and end their other sessions. Returns 204.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    if !meets_min_length(&input.new_password, MIN_PASSWORD_LENGTH) {
        return Err(AppError::Core(CoreError::Validation(state.text(
            Message::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            },
        ))));
    }
    if input.new_password != input.confirm_password {
        return Err(AppError::Core(CoreError::Validation(
            state.text(Message::PasswordConfirmationMismatch),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(state.text(Message::NotAuthenticated)))
        })?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Validation(
            state.text(Message::CurrentPasswordIncorrect),
        )));
    }

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    let revoked = SessionRepo::delete_others_for_user(&state.pool, user.id, &auth.session_id).await?;
    tracing::info!(user_id = user.id, revoked, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert a new regular account after checking the username is free.
///
/// With `require_group` set, a missing or blank family id is rejected with
/// 400. A concurrent insert of the same name still fails on the unique
/// constraint and surfaces as 409.
pub(crate) async fn create_account(
    state: &AppState,
    input: &NewAccountRequest,
    require_group: bool,
) -> AppResult<User> {
    let username = input.username.trim();
    let group_id = trimmed(input.group_id.as_deref());
    if require_group && group_id.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            state.text(Message::FamilyIdRequired),
        )));
    }

    if UserRepo::find_by_username(&state.pool, username)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            state.text(Message::UsernameTaken),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: username.to_string(),
            password_hash,
            group_id,
            is_admin: false,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User created");
    Ok(user)
}
