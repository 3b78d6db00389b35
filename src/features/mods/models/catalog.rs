use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::shared::tree::TreeItem;

/// Catalog entry for a modification. `parent_mod_id = None` marks a root;
/// a child mod unlocks once its parent is completed on a car.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Mod {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub parent_mod_id: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Mod {
    pub fn is_root(&self) -> bool {
        self.parent_mod_id.is_none()
    }
}

impl TreeItem for Mod {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn parent_node_id(&self) -> Option<&str> {
        self.parent_mod_id.as_deref()
    }
}

/// Presentation order for catalog listings: case-insensitive name, then id
pub fn compare_by_name(a: &Mod, b: &Mod) -> std::cmp::Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}
