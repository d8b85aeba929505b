//! Repository for the `items` table.
//!
//! Every read and write that targets existing items is filtered through an
//! [`ItemScope`], so an item outside the caller's scope behaves exactly like a
//! missing one.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use stocker_core::scope::ItemScope;
use stocker_core::snapshot::ItemFields;
use stocker_core::status::StockStatus;
use stocker_core::types::DbId;

use crate::models::item::{CreateItem, Item};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, category, memo, status, is_shared, is_memo_only, should_buy, \
                       owner_id, group_id, updated_at, updated_by";

/// Result of checking an item off the shopping list.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOff {
    /// One-time entry; the row is gone.
    Removed,
    /// Stock-tracked item, now back at plenty.
    Restocked(Item),
}

/// Append the visibility predicate for `scope`.
fn push_scope(qb: &mut QueryBuilder<'_, Sqlite>, scope: &ItemScope) {
    match scope {
        ItemScope::Group { group_id, user_id } => {
            qb.push("group_id = ")
                .push_bind(group_id.clone())
                .push(" AND (is_shared = 1 OR owner_id = ")
                .push_bind(*user_id)
                .push(")");
        }
        ItemScope::Owner { user_id } => {
            qb.push("owner_id = ").push_bind(*user_id);
        }
    }
}

/// Provides scoped CRUD operations for items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateItem) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items
                (name, category, memo, status, is_shared, is_memo_only, should_buy,
                 owner_id, group_id, updated_at, updated_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?8, ?9, ?10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.memo)
            .bind(input.status.id())
            .bind(input.is_shared)
            .bind(input.is_memo_only)
            .bind(input.owner_id)
            .bind(&input.group_id)
            .bind(Utc::now())
            .bind(&input.updated_by)
            .fetch_one(pool)
            .await
    }

    /// List every item visible in `scope`, oldest first.
    pub async fn list_visible(
        pool: &SqlitePool,
        scope: &ItemScope,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM items WHERE "));
        push_scope(&mut qb, scope);
        qb.push(" ORDER BY id ASC");
        qb.build_query_as::<Item>().fetch_all(pool).await
    }

    /// Find one item by ID if it is visible in `scope`.
    pub async fn find_visible(
        pool: &SqlitePool,
        scope: &ItemScope,
        id: DbId,
    ) -> Result<Option<Item>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM items WHERE id = "));
        qb.push_bind(id).push(" AND ");
        push_scope(&mut qb, scope);
        qb.build_query_as::<Item>().fetch_optional(pool).await
    }

    /// Number of items a user owns, regardless of sharing.
    pub async fn count_owned_by(pool: &SqlitePool, owner_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items WHERE owner_id = ?1")
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Set the stock status. Returns `None` if the item is not visible.
    pub async fn set_status(
        pool: &SqlitePool,
        scope: &ItemScope,
        id: DbId,
        status: StockStatus,
        updated_by: &str,
    ) -> Result<Option<Item>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE items SET status = ");
        qb.push_bind(status.id());
        Self::push_touch_and_filter(&mut qb, scope, id, updated_by);
        qb.build_query_as::<Item>().fetch_optional(pool).await
    }

    /// Set the should-buy flag. Returns `None` if the item is not visible.
    pub async fn set_should_buy(
        pool: &SqlitePool,
        scope: &ItemScope,
        id: DbId,
        should_buy: bool,
        updated_by: &str,
    ) -> Result<Option<Item>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE items SET should_buy = ");
        qb.push_bind(should_buy);
        Self::push_touch_and_filter(&mut qb, scope, id, updated_by);
        qb.build_query_as::<Item>().fetch_optional(pool).await
    }

    /// Replace the user-editable fields. Status and should-buy are untouched.
    pub async fn update_fields(
        pool: &SqlitePool,
        scope: &ItemScope,
        id: DbId,
        fields: &ItemFields,
        updated_by: &str,
    ) -> Result<Option<Item>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE items SET name = ");
        qb.push_bind(fields.name.clone())
            .push(", memo = ")
            .push_bind(fields.memo.clone())
            .push(", category = ")
            .push_bind(fields.category.clone())
            .push(", is_shared = ")
            .push_bind(fields.is_shared)
            .push(", is_memo_only = ")
            .push_bind(fields.is_memo_only);
        Self::push_touch_and_filter(&mut qb, scope, id, updated_by);
        qb.build_query_as::<Item>().fetch_optional(pool).await
    }

    /// Delete an item. Returns `true` if a visible row was removed.
    pub async fn delete(pool: &SqlitePool, scope: &ItemScope, id: DbId) -> Result<bool, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM items WHERE id = ");
        qb.push_bind(id).push(" AND ");
        push_scope(&mut qb, scope);
        let result = qb.build().execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check an item off the shopping list.
    ///
    /// One-time entries are deleted; stock-tracked items go back to plenty.
    /// Returns `None` if the item is not visible.
    pub async fn check_off(
        pool: &SqlitePool,
        scope: &ItemScope,
        id: DbId,
        updated_by: &str,
    ) -> Result<Option<CheckOff>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT is_memo_only FROM items WHERE id = ");
        qb.push_bind(id).push(" AND ");
        push_scope(&mut qb, scope);
        let memo_only: Option<bool> = qb
            .build_query_scalar::<bool>()
            .fetch_optional(&mut *tx)
            .await?;

        let outcome = match memo_only {
            None => None,
            Some(true) => {
                sqlx::query("DELETE FROM items WHERE id = ?1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                Some(CheckOff::Removed)
            }
            Some(false) => {
                let query = format!(
                    "UPDATE items SET status = ?2, updated_at = ?3, updated_by = ?4
                     WHERE id = ?1
                     RETURNING {COLUMNS}"
                );
                let item = sqlx::query_as::<_, Item>(&query)
                    .bind(id)
                    .bind(StockStatus::Plenty.id())
                    .bind(Utc::now())
                    .bind(updated_by)
                    .fetch_one(&mut *tx)
                    .await?;
                Some(CheckOff::Restocked(item))
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Append the audit columns, the id and scope filter, and `RETURNING`.
    fn push_touch_and_filter(
        qb: &mut QueryBuilder<'_, Sqlite>,
        scope: &ItemScope,
        id: DbId,
        updated_by: &str,
    ) {
        qb.push(", updated_at = ")
            .push_bind(Utc::now())
            .push(", updated_by = ")
            .push_bind(updated_by.to_string())
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND ");
        push_scope(qb, scope);
        qb.push(" RETURNING ").push(COLUMNS);
    }
}
