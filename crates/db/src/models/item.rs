//! Item entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use stocker_core::snapshot::{ItemFields, TrackedItem};
use stocker_core::status::StockStatus;
use stocker_core::types::{DbId, Timestamp};
use stocker_core::view::StockItem;

/// A row from the `items` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub memo: Option<String>,
    #[sqlx(try_from = "i64")]
    pub status: StockStatus,
    pub is_shared: bool,
    pub is_memo_only: bool,
    pub should_buy: bool,
    pub owner_id: DbId,
    pub group_id: Option<String>,
    pub updated_at: Timestamp,
    /// Username of the last member who changed the item.
    pub updated_by: Option<String>,
}

impl StockItem for Item {
    fn status(&self) -> StockStatus {
        self.status
    }

    fn is_memo_only(&self) -> bool {
        self.is_memo_only
    }

    fn should_buy(&self) -> bool {
        self.should_buy
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }
}

impl TrackedItem for Item {
    fn id(&self) -> DbId {
        self.id
    }

    fn set_status(&mut self, status: StockStatus) {
        self.status = status;
    }

    fn set_should_buy(&mut self, should_buy: bool) {
        self.should_buy = should_buy;
    }

    fn set_fields(&mut self, fields: &ItemFields) {
        self.name = fields.name.clone();
        self.memo = fields.memo.clone();
        self.category = fields.category.clone();
        self.is_shared = fields.is_shared;
        self.is_memo_only = fields.is_memo_only;
    }
}

/// DTO for inserting a new item.
#[derive(Debug)]
pub struct CreateItem {
    pub name: String,
    pub category: String,
    pub memo: Option<String>,
    pub status: StockStatus,
    pub is_shared: bool,
    pub is_memo_only: bool,
    pub owner_id: DbId,
    pub group_id: Option<String>,
    pub updated_by: String,
}
