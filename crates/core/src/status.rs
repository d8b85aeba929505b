//! Item stock level.
//!
//! The discriminants are the integers persisted in `items.status`. The cycle
//! order is the declaration order: Plenty -> Low -> Empty -> Plenty.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status ID type matching the INTEGER `items.status` column.
pub type StatusId = i64;

/// Stock level of an item, cycled by the user.
#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum StockStatus {
    /// Enough in the house.
    Plenty = 0,
    /// Running low.
    Low = 1,
    /// Out of stock; needs purchase.
    Empty = 2,
}

impl StockStatus {
    /// Every status in cycle order.
    pub const ALL: [StockStatus; 3] = [Self::Plenty, Self::Low, Self::Empty];

    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// The next status in the cycle, wrapping from the last to the first.
    pub fn next(self) -> Self {
        let len = Self::ALL.len() as StatusId;
        Self::ALL[((self.id() + 1) % len) as usize]
    }

    /// Whether the item belongs on the shopping list by stock level alone.
    pub fn needs_purchase(self) -> bool {
        self != Self::Plenty
    }

    /// Stable machine-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plenty => "plenty",
            Self::Low => "low",
            Self::Empty => "empty",
        }
    }
}

impl From<StockStatus> for StatusId {
    fn from(value: StockStatus) -> Self {
        value as StatusId
    }
}

impl TryFrom<StatusId> for StockStatus {
    type Error = CoreError;

    fn try_from(value: StatusId) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.id() == value)
            .ok_or_else(|| CoreError::Validation(format!("Unknown stock status: {value}")))
    }
}
