//! Optimistic item changes and their reconciliation.
//!
//! Every item mutation the server performs is described by one [`ItemChange`]
//! variant. Mutation endpoints return the change they applied; clients apply
//! the same variant to their local list ahead of the response and settle it
//! through [`Snapshot`] once the outcome is known.

use serde::{Deserialize, Serialize};

use crate::status::StockStatus;
use crate::types::DbId;
use crate::view::StockItem;

/// User-editable item fields replaced by a full update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFields {
    pub name: String,
    pub memo: Option<String>,
    pub category: String,
    pub is_shared: bool,
    pub is_memo_only: bool,
}

/// Write access needed to apply an [`ItemChange`].
pub trait TrackedItem: StockItem + Clone {
    fn id(&self) -> DbId;
    fn set_status(&mut self, status: StockStatus);
    fn set_should_buy(&mut self, should_buy: bool);
    fn set_fields(&mut self, fields: &ItemFields);
}

/// A single mutation of the item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemChange {
    StatusChanged {
        item_id: DbId,
        status: StockStatus,
    },
    /// Checked off the shopping list. `removed` is true when the item was a
    /// one-time entry and has been deleted; otherwise it went back to plenty.
    CheckedOff {
        item_id: DbId,
        removed: bool,
    },
    Deleted {
        item_id: DbId,
    },
    ShouldBuyToggled {
        item_id: DbId,
        should_buy: bool,
    },
    Updated {
        item_id: DbId,
        fields: ItemFields,
    },
}

impl ItemChange {
    /// The change produced by checking an item off the shopping list.
    pub fn check_off<T: TrackedItem>(item: &T) -> Self {
        Self::CheckedOff {
            item_id: item.id(),
            removed: item.is_memo_only(),
        }
    }

    /// The change produced by tapping an item's status badge.
    pub fn advance_status<T: TrackedItem>(item: &T) -> Self {
        Self::StatusChanged {
            item_id: item.id(),
            status: item.status().next(),
        }
    }

    pub fn item_id(&self) -> DbId {
        match self {
            Self::StatusChanged { item_id, .. }
            | Self::CheckedOff { item_id, .. }
            | Self::Deleted { item_id }
            | Self::ShouldBuyToggled { item_id, .. }
            | Self::Updated { item_id, .. } => *item_id,
        }
    }

    /// Apply the change in place. Changes to unknown ids are no-ops.
    pub fn apply<T: TrackedItem>(&self, items: &mut Vec<T>) {
        let id = self.item_id();
        match self {
            Self::Deleted { .. } | Self::CheckedOff { removed: true, .. } => {
                items.retain(|item| item.id() != id);
            }
            Self::CheckedOff { removed: false, .. } => {
                for_item(items, id, |item| item.set_status(StockStatus::Plenty));
            }
            Self::StatusChanged { status, .. } => {
                for_item(items, id, |item| item.set_status(*status));
            }
            Self::ShouldBuyToggled { should_buy, .. } => {
                for_item(items, id, |item| item.set_should_buy(*should_buy));
            }
            Self::Updated { fields, .. } => {
                for_item(items, id, |item| item.set_fields(fields));
            }
        }
    }

    /// Apply the change to a copy of `items`, leaving the input untouched.
    pub fn applied_to<T: TrackedItem>(&self, items: &[T]) -> Vec<T> {
        let mut next = items.to_vec();
        self.apply(&mut next);
        next
    }
}

fn for_item<T: TrackedItem>(items: &mut [T], id: DbId, f: impl FnOnce(&mut T)) {
    if let Some(item) = items.iter_mut().find(|item| item.id() == id) {
        f(item);
    }
}

/// Handle for a change awaiting the server's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingId(u64);

/// Item list with optimistic changes layered over the last confirmed state.
///
/// The visible list is always `confirmed` with every pending change applied in
/// submission order, so a rejected change disappears without disturbing the
/// others.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    confirmed: Vec<T>,
    pending: Vec<(PendingId, ItemChange)>,
    visible: Vec<T>,
    next_id: u64,
}

impl<T: TrackedItem> Snapshot<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            visible: items.clone(),
            confirmed: items,
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// The list as the user should see it right now.
    pub fn items(&self) -> &[T] {
        &self.visible
    }

    /// The last state known to match the server.
    pub fn confirmed(&self) -> &[T] {
        &self.confirmed
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Apply a change optimistically.
    pub fn propose(&mut self, change: ItemChange) -> PendingId {
        let id = PendingId(self.next_id);
        self.next_id += 1;
        change.apply(&mut self.visible);
        self.pending.push((id, change));
        id
    }

    /// The server accepted a change. `applied` is the change the server
    /// reports; it replaces the proposed one when present.
    ///
    /// Returns false if `id` is not pending.
    pub fn confirm(&mut self, id: PendingId, applied: Option<ItemChange>) -> bool {
        let Some(pos) = self.pending.iter().position(|(p, _)| *p == id) else {
            return false;
        };
        let (_, proposed) = self.pending.remove(pos);
        applied.unwrap_or(proposed).apply(&mut self.confirmed);
        self.rebuild();
        true
    }

    /// The server rejected a change: drop it and restore the list.
    ///
    /// Returns false if `id` is not pending.
    pub fn rollback(&mut self, id: PendingId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(p, _)| *p != id);
        if self.pending.len() == before {
            return false;
        }
        self.rebuild();
        true
    }

    /// Replace the confirmed state with a fresh server listing. Changes still
    /// in flight stay applied on top.
    pub fn replace(&mut self, items: Vec<T>) {
        self.confirmed = items;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let mut visible = self.confirmed.clone();
        for (_, change) in &self.pending {
            change.apply(&mut visible);
        }
        self.visible = visible;
    }
}
