//! Handlers for the `/items` resource.
//!
//! Every handler works inside the caller's [`ItemScope`]; an item outside it
//! is reported exactly like a missing one. Mutations answer with the
//! [`ItemChange`] they applied.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use stocker_core::error::CoreError;
use stocker_core::limits::{MAX_CATEGORY_LENGTH, MAX_ITEM_NAME_LENGTH, MAX_MEMO_LENGTH};
use stocker_core::messages::Message;
use stocker_core::scope::ItemScope;
use stocker_core::snapshot::{ItemChange, ItemFields};
use stocker_core::status::{StatusId, StockStatus};
use stocker_core::types::DbId;
use stocker_core::view::{self, CategoryFilter, ViewMode, UNCATEGORIZED};
use stocker_db::models::item::{CreateItem, Item};
use stocker_db::repositories::{CheckOff, ItemRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{not_blank, trimmed, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// Request body for `POST /items`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddItemRequest {
    #[validate(length(max = MAX_ITEM_NAME_LENGTH), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = MAX_CATEGORY_LENGTH))]
    pub category: Option<String>,
    #[validate(length(max = MAX_MEMO_LENGTH))]
    pub memo: Option<String>,
    /// One-time purchase; never listed in the stock view.
    #[serde(default)]
    pub is_memo_only: bool,
    /// Start on the shopping list instead of at plenty.
    #[serde(default)]
    pub add_to_shopping_list: bool,
    #[serde(default = "default_true")]
    pub is_shared: bool,
}

/// Request body for `PUT /items/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(max = MAX_ITEM_NAME_LENGTH), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = MAX_CATEGORY_LENGTH))]
    pub category: Option<String>,
    #[validate(length(max = MAX_MEMO_LENGTH))]
    pub memo: Option<String>,
    #[serde(default = "default_true")]
    pub is_shared: bool,
    #[serde(default)]
    pub is_memo_only: bool,
}

/// Request body for `POST /items/{id}/toggle-status`.
#[derive(Debug, Deserialize, Validate)]
pub struct ToggleStatusRequest {
    /// The status the client currently shows.
    pub current_status: StatusId,
}

/// Request body for `POST /items/{id}/toggle-should-buy`.
#[derive(Debug, Deserialize, Validate)]
pub struct ToggleShouldBuyRequest {
    /// The should-buy flag the client currently shows.
    pub current: bool,
}

/// Query parameters for `GET /items/view`.
#[derive(Debug, Deserialize)]
pub struct ViewParams {
    #[serde(default)]
    pub view: ViewMode,
    pub category: Option<String>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/items
///
/// Every visible item, oldest first.
pub async fn list_items(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Item>>>> {
    let items = ItemRepo::list_visible(&state.pool, &auth.scope()).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/items/view?view=stock|shopping&category=<tag>
///
/// The list screen: category strip plus items grouped by category.
pub async fn item_view(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ViewParams>,
) -> AppResult<Response> {
    let items = ItemRepo::list_visible(&state.pool, &auth.scope()).await?;
    let filter = CategoryFilter::from_param(params.category.as_deref());
    let view = view::build_view(&items, params.view, &filter);

    Ok(Json(DataResponse { data: view }).into_response())
}

/// GET /api/v1/items/categories
///
/// Category suggestions for the add and edit forms.
pub async fn category_suggestions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let items = ItemRepo::list_visible(&state.pool, &auth.scope()).await?;
    Ok(Json(DataResponse {
        data: view::category_suggestions(&items),
    }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/items
///
/// Returns 201 with the created item.
pub async fn add_item(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<AddItemRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Item>>)> {
    let policy = &state.config.accounts;
    if auth.username == policy.demo_username {
        let owned = ItemRepo::count_owned_by(&state.pool, auth.user_id).await?;
        if owned >= policy.demo_item_limit {
            return Err(AppError::Core(CoreError::Forbidden(state.text(
                Message::DemoItemLimit {
                    limit: policy.demo_item_limit,
                },
            ))));
        }
    }

    let status = if input.is_memo_only || input.add_to_shopping_list {
        StockStatus::Empty
    } else {
        StockStatus::Plenty
    };

    let group_id = match auth.scope() {
        ItemScope::Group { group_id, .. } => Some(group_id),
        ItemScope::Owner { .. } => None,
    };

    let item = ItemRepo::create(
        &state.pool,
        &CreateItem {
            name: input.name.trim().to_string(),
            category: normalize_category(input.category.as_deref()),
            memo: trimmed(input.memo.as_deref()),
            status,
            is_shared: input.is_shared,
            is_memo_only: input.is_memo_only,
            owner_id: auth.user_id,
            group_id,
            updated_by: auth.username.clone(),
        },
    )
    .await?;

    tracing::info!(item_id = item.id, user_id = auth.user_id, status = status.as_str(), "Item added");
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// POST /api/v1/items/{id}/toggle-status
///
/// Advance the status one step from what the client shows.
pub async fn toggle_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<ToggleStatusRequest>,
) -> AppResult<Json<DataResponse<ItemChange>>> {
    let current = StockStatus::try_from(input.current_status)
        .map_err(|_| AppError::Core(CoreError::Validation(state.text(Message::InvalidInput))))?;
    let next = current.next();

    ItemRepo::set_status(&state.pool, &auth.scope(), id, next, &auth.username)
        .await?
        .ok_or_else(|| item_not_found(&state))?;

    tracing::debug!(item_id = id, from = current.as_str(), to = next.as_str(), "Status toggled");
    Ok(Json(DataResponse {
        data: ItemChange::StatusChanged {
            item_id: id,
            status: next,
        },
    }))
}

/// POST /api/v1/items/{id}/toggle-should-buy
pub async fn toggle_should_buy(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<ToggleShouldBuyRequest>,
) -> AppResult<Json<DataResponse<ItemChange>>> {
    let should_buy = !input.current;

    ItemRepo::set_should_buy(&state.pool, &auth.scope(), id, should_buy, &auth.username)
        .await?
        .ok_or_else(|| item_not_found(&state))?;

    Ok(Json(DataResponse {
        data: ItemChange::ShouldBuyToggled {
            item_id: id,
            should_buy,
        },
    }))
}

/// POST /api/v1/items/{id}/check
///
/// Check an item off the shopping list.
pub async fn check_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ItemChange>>> {
    let outcome = ItemRepo::check_off(&state.pool, &auth.scope(), id, &auth.username)
        .await?
        .ok_or_else(|| item_not_found(&state))?;

    let removed = matches!(outcome, CheckOff::Removed);
    tracing::info!(item_id = id, removed, "Item checked off");

    Ok(Json(DataResponse {
        data: ItemChange::CheckedOff {
            item_id: id,
            removed,
        },
    }))
}

/// PUT /api/v1/items/{id}
///
/// Replace the editable fields. Status and should-buy are kept.
pub async fn update_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateItemRequest>,
) -> AppResult<Json<DataResponse<ItemChange>>> {
    let fields = ItemFields {
        name: input.name.trim().to_string(),
        memo: trimmed(input.memo.as_deref()),
        category: normalize_category(input.category.as_deref()),
        is_shared: input.is_shared,
        is_memo_only: input.is_memo_only,
    };

    ItemRepo::update_fields(&state.pool, &auth.scope(), id, &fields, &auth.username)
        .await?
        .ok_or_else(|| item_not_found(&state))?;

    Ok(Json(DataResponse {
        data: ItemChange::Updated { item_id: id, fields },
    }))
}

/// DELETE /api/v1/items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ItemChange>>> {
    if !ItemRepo::delete(&state.pool, &auth.scope(), id).await? {
        return Err(item_not_found(&state));
    }

    tracing::info!(item_id = id, user_id = auth.user_id, "Item deleted");
    Ok(Json(DataResponse {
        data: ItemChange::Deleted { item_id: id },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn item_not_found(state: &AppState) -> AppError {
    AppError::NotFound(state.text(Message::ItemNotFound))
}

/// Blank or missing categories are stored as the uncategorized label.
fn normalize_category(category: Option<&str>) -> String {
    trimmed(category).unwrap_or_else(|| UNCATEGORIZED.to_string())
}
