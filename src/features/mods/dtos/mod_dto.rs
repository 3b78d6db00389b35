use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::mods::models::Mod;
use crate::shared::constants::MAX_MOD_NAME_LENGTH;
use crate::shared::patch::Patch;
use crate::shared::tree::TreeNode;
use crate::shared::validation::{
    validate_category, validate_category_patch, validate_not_blank, validate_url_patch,
};

/// Response DTO for a catalog mod
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModResponseDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub parent_mod_id: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Mod> for ModResponseDto {
    fn from(m: Mod) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            parent_mod_id: m.parent_mod_id,
            category: m.category,
            image_url: m.image_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Response DTO for the mod tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct ModTreeDto {
    #[serde(rename = "mod")]
    pub modification: ModResponseDto,
    pub children: Vec<ModTreeDto>,
}

impl From<TreeNode<Mod>> for ModTreeDto {
    fn from(node: TreeNode<Mod>) -> Self {
        Self {
            modification: node.item.into(),
            children: node.children.into_iter().map(Into::into).collect(),
        }
    }
}

/// Query params for listing mods
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ModQueryParams {
    /// Only mods tagged with this category
    pub category: Option<String>,

    /// Only mods without a parent
    #[serde(default)]
    pub roots_only: bool,

    /// Return the nested mod tree instead of a flat list
    #[serde(default)]
    pub tree: bool,
}

/// Request DTO for creating a mod
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateModDto {
    #[validate(
        length(min = 1, max = MAX_MOD_NAME_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    pub description: Option<String>,

    /// Parent mod that must be completed before this one unlocks
    pub parent_mod_id: Option<String>,

    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,

    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Request DTO for updating a mod.
///
/// Nullable fields follow patch semantics: omit to keep, `null` to clear.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateModDto {
    #[validate(
        length(min = 1, max = MAX_MOD_NAME_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub parent_mod_id: Patch<String>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "validate_category_patch"))]
    pub category: Patch<String>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "validate_url_patch"))]
    pub image_url: Patch<String>,
}

impl UpdateModDto {
    /// Fold the update into the stored row
    pub fn apply_to(self, mut current: Mod, now: DateTime<Utc>) -> Mod {
        if let Some(name) = self.name {
            current.name = name;
        }
        current.description = self.description.apply(current.description);
        current.parent_mod_id = self.parent_mod_id.apply(current.parent_mod_id);
        current.category = self.category.apply(current.category);
        current.image_url = self.image_url.apply(current.image_url);
        current.updated_at = Some(now);
        current
    }
}
