//! Item visibility.
//!
//! [`ItemScope`] is the only place that decides which items a user may see or
//! change. The repository layer renders it into SQL; [`ItemScope::allows`] is
//! the in-memory form of the same rule.

use crate::types::DbId;

/// The set of items visible to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemScope {
    /// A grouped user sees every shared item of the group plus their own
    /// private items in it.
    Group { group_id: String, user_id: DbId },
    /// An ungrouped user sees only items they own.
    Owner { user_id: DbId },
}

impl ItemScope {
    /// Build the scope for a user. A blank group id counts as no group.
    pub fn for_user(user_id: DbId, group_id: Option<&str>) -> Self {
        match group_id.map(str::trim).filter(|g| !g.is_empty()) {
            Some(group_id) => Self::Group {
                group_id: group_id.to_string(),
                user_id,
            },
            None => Self::Owner { user_id },
        }
    }

    pub fn user_id(&self) -> DbId {
        match self {
            Self::Group { user_id, .. } | Self::Owner { user_id } => *user_id,
        }
    }

    /// Whether an item with the given ownership attributes is visible.
    pub fn allows(&self, owner_id: DbId, group_id: Option<&str>, is_shared: bool) -> bool {
        match self {
            Self::Group {
                group_id: scope_group,
                user_id,
            } => group_id == Some(scope_group.as_str()) && (is_shared || owner_id == *user_id),
            Self::Owner { user_id } => owner_id == *user_id,
        }
    }
}
