//! Mapping Monzo category labels onto the owner's categories
//!
//! Categories are matched on their external key, never on display name.

use std::collections::{BTreeSet, HashMap};

use tracing::info;

use crate::error::Result;
use crate::models::NewCategory;
use crate::store::ImportStore;

const DEFAULT_COLOR: &str = "#6366f1";
const DEFAULT_ICON: &str = "tag";

/// Display style for the Monzo categories we know about: (label, color, icon)
const CATEGORY_STYLES: &[(&str, &str, &str)] = &[
    ("Bills", "#ef4444", "receipt"),
    ("Charity", "#ec4899", "heart"),
    ("Eating out", "#f97316", "utensils"),
    ("Entertainment", "#a855f7", "film"),
    ("Expenses", "#64748b", "briefcase"),
    ("Family", "#14b8a6", "users"),
    ("Finances", "#3b82f6", "landmark"),
    ("General", "#6366f1", "tag"),
    ("Gifts", "#f43f5e", "gift"),
    ("Groceries", "#22c55e", "shopping-cart"),
    ("Holidays", "#06b6d4", "plane"),
    ("Personal care", "#d946ef", "heart"),
    ("Shopping", "#eab308", "shopping-bag"),
    ("Transport", "#0ea5e9", "car"),
    ("Transfers", "#8b5cf6", "arrow-right-left"),
];

/// Color and icon for a Monzo label, falling back to the default style
pub fn category_style(label: &str) -> (&'static str, &'static str) {
    CATEGORY_STYLES
        .iter()
        .find(|(name, _, _)| *name == label)
        .map(|(_, color, icon)| (*color, *icon))
        .unwrap_or((DEFAULT_COLOR, DEFAULT_ICON))
}

/// Resolve external labels to category IDs, creating any that are missing
pub fn reconcile<'a, S, I>(store: &S, owner: &str, labels: I) -> Result<HashMap<String, i64>>
where
    S: ImportStore + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    let mut map: HashMap<String, i64> = store
        .list_categories(owner)?
        .into_iter()
        .filter_map(|c| c.external_key.map(|key| (key, c.id)))
        .collect();

    // BTreeSet keeps creation order stable across runs
    let missing: BTreeSet<&str> = labels
        .into_iter()
        .filter(|label| !label.is_empty() && !map.contains_key(*label))
        .collect();

    if missing.is_empty() {
        return Ok(map);
    }

    let new_categories: Vec<NewCategory> = missing
        .iter()
        .map(|label| {
            let (color, icon) = category_style(label);
            NewCategory {
                name: label.to_string(),
                color: color.to_string(),
                icon: icon.to_string(),
                is_system: true,
                external_key: Some(label.to_string()),
            }
        })
        .collect();

    let created = store.insert_categories(owner, &new_categories)?;
    info!("Created {} categories for {}", created.len(), owner);

    for category in created {
        if let Some(key) = category.external_key {
            map.insert(key, category.id);
        }
    }

    Ok(map)
}
