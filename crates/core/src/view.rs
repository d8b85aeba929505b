//! Stock and shopping list views.
//!
//! Pure transformation of the visible item set into what the list screen
//! shows: a view-mode filter, an optional category filter, and a grouping by
//! category that preserves encounter order.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::status::StockStatus;

/// Label used for items whose category is missing or blank.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Read access to the item attributes the views depend on.
pub trait StockItem {
    fn status(&self) -> StockStatus;
    fn is_memo_only(&self) -> bool;
    fn should_buy(&self) -> bool;
    fn category(&self) -> Option<&str>;
}

/// Which list the user is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Every stock-tracked item, whatever its level.
    #[default]
    Stock,
    /// Items that need buying.
    Shopping,
}

impl ViewMode {
    /// Whether an item is part of this view.
    pub fn includes<T: StockItem + ?Sized>(self, item: &T) -> bool {
        match self {
            Self::Stock => !item.is_memo_only(),
            Self::Shopping => item.status().needs_purchase() && item.should_buy(),
        }
    }
}

/// Secondary filter on the effective category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Build from a query parameter. Missing, blank and `"all"` mean no filter.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            None | Some("") | Some("all") => Self::All,
            Some(tag) => Self::Only(tag.to_string()),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(tag) => tag == category,
        }
    }
}

/// The category an item is listed under.
pub fn effective_category(category: Option<&str>) -> &str {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => UNCATEGORIZED,
    }
}

/// One heading of the list with the items under it.
#[derive(Debug, Serialize)]
pub struct CategoryGroup<'a, T> {
    pub category: String,
    pub items: Vec<&'a T>,
}

/// The computed list screen.
#[derive(Debug, Serialize)]
pub struct ItemView<'a, T> {
    pub view: ViewMode,
    /// Category strip: every category present in the view before the
    /// category filter is applied, in encounter order.
    pub categories: Vec<String>,
    pub groups: Vec<CategoryGroup<'a, T>>,
}

impl<T> ItemView<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

/// Group items by effective category in a single pass.
///
/// Group order is the order in which each category is first seen; items keep
/// their relative order inside a group.
pub fn group_by_category<'a, T, I>(items: I) -> IndexMap<String, Vec<&'a T>>
where
    T: StockItem + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut groups: IndexMap<String, Vec<&'a T>> = IndexMap::new();
    for item in items {
        groups
            .entry(effective_category(item.category()).to_string())
            .or_default()
            .push(item);
    }
    groups
}

/// Apply the view mode and category filter, then group.
pub fn build_view<'a, T: StockItem>(
    items: &'a [T],
    view: ViewMode,
    filter: &CategoryFilter,
) -> ItemView<'a, T> {
    let in_view: Vec<&'a T> = items.iter().filter(|item| view.includes(*item)).collect();

    let categories: IndexSet<&str> = in_view
        .iter()
        .map(|item| effective_category(item.category()))
        .collect();

    let groups = group_by_category(
        in_view
            .iter()
            .copied()
            .filter(|item| filter.matches(effective_category(item.category()))),
    )
    .into_iter()
    .map(|(category, items)| CategoryGroup { category, items })
    .collect();

    ItemView {
        view,
        categories: categories.into_iter().map(str::to_string).collect(),
        groups,
    }
}

/// Categories offered as suggestions in the add/edit forms.
///
/// Memo-only entries that are already at plenty are leftovers of a finished
/// shopping trip and do not contribute. Missing or blank categories are
/// skipped.
pub fn category_suggestions<T: StockItem>(items: &[T]) -> Vec<String> {
    let active: IndexSet<&str> = items
        .iter()
        .filter(|item| !(item.is_memo_only() && item.status() == StockStatus::Plenty))
        .filter_map(|item| item.category().map(str::trim))
        .filter(|c| !c.is_empty())
        .collect();
    active.into_iter().map(str::to_string).collect()
}
