use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::features::car_mods::models::{CarModEntry, ModStatus, ModStatusTree};
use crate::features::mods::dtos::ModResponseDto;
use crate::shared::constants::MAX_NOTES_LENGTH;
use crate::shared::patch::Patch;

/// Response DTO for a ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CarModResponseDto {
    pub id: String,
    pub car_id: String,
    pub mod_id: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<CarModEntry> for CarModResponseDto {
    fn from(entry: CarModEntry) -> Self {
        Self {
            id: entry.id,
            car_id: entry.car_id,
            mod_id: entry.mod_id,
            completed_at: entry.completed_at,
            notes: entry.notes,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// A catalog mod with this car's progress on it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModStatusDto {
    #[serde(rename = "mod")]
    pub modification: ModResponseDto,
    pub car_mod: Option<CarModResponseDto>,
    pub is_completed: bool,
    pub is_unlocked: bool,
}

impl From<ModStatus> for ModStatusDto {
    fn from(status: ModStatus) -> Self {
        Self {
            modification: status.modification.into(),
            car_mod: status.car_mod.map(Into::into),
            is_completed: status.is_completed,
            is_unlocked: status.is_unlocked,
        }
    }
}

/// Status tree node; the status fields sit alongside `children`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct ModStatusTreeDto {
    #[serde(flatten)]
    pub status: ModStatusDto,
    pub children: Vec<ModStatusTreeDto>,
}

impl From<ModStatusTree> for ModStatusTreeDto {
    fn from(node: ModStatusTree) -> Self {
        Self {
            status: node.item.into(),
            children: node.children.into_iter().map(Into::into).collect(),
        }
    }
}

/// Query params for the status tree
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ModTreeQuery {
    /// Return only root mods as a flat list, each with empty children
    #[serde(default)]
    pub roots_only: bool,
}

/// Request DTO for marking a mod completed
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct MarkCompletedDto {
    /// Overwrites existing notes when present
    #[validate(length(max = MAX_NOTES_LENGTH))]
    pub notes: Option<String>,
}

fn validate_notes_patch(notes: &Patch<String>) -> Result<(), ValidationError> {
    match notes {
        Patch::Set(value) if value.chars().count() as u64 > MAX_NOTES_LENGTH => {
            let mut error = ValidationError::new("length");
            error.message =
                Some(format!("notes must be at most {} characters", MAX_NOTES_LENGTH).into());
            Err(error)
        }
        _ => Ok(()),
    }
}

/// Request DTO for editing a ledger entry.
///
/// Each field: omit to keep, `null` to clear, value to set.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCarModDto {
    #[serde(default)]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub completed_at: Patch<DateTime<Utc>>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "validate_notes_patch"))]
    pub notes: Patch<String>,
}

impl UpdateCarModDto {
    pub fn apply_to(self, mut entry: CarModEntry, now: DateTime<Utc>) -> CarModEntry {
        entry.completed_at = self.completed_at.apply(entry.completed_at);
        entry.notes = self.notes.apply(entry.notes);
        entry.updated_at = Some(now);
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::mods::models::catalog::fixtures::{catalog_mod, ts};
    use crate::shared::tree::TreeNode;

    fn stored_entry() -> CarModEntry {
        CarModEntry {
            id: "entry-1".to_string(),
            car_id: "car-1".to_string(),
            mod_id: "cai".to_string(),
            completed_at: Some(ts()),
            notes: Some("K&N filter".to_string()),
            created_at: ts(),
            updated_at: None,
        }
    }

    #[test]
    fn test_patch_omitted_keeps_null_clears_value_sets() {
        let now = ts() + chrono::Duration::days(1);

        let dto: UpdateCarModDto =
            serde_json::from_value(serde_json::json!({ "completed_at": null })).unwrap();
        let entry = dto.apply_to(stored_entry(), now);
        assert!(entry.completed_at.is_none());
        assert_eq!(entry.notes.as_deref(), Some("K&N filter"));
        assert_eq!(entry.updated_at, Some(now));

        let dto: UpdateCarModDto = serde_json::from_value(serde_json::json!({
            "notes": "Swapped to AEM",
            "completed_at": "2024-03-01T12:00:00Z"
        }))
        .unwrap();
        let entry = dto.apply_to(stored_entry(), now);
        assert_eq!(entry.notes.as_deref(), Some("Swapped to AEM"));
        assert_eq!(
            entry.completed_at.map(|t| t.to_rfc3339()),
            Some("2024-03-01T12:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_notes_patch_length_is_validated() {
        let dto = UpdateCarModDto {
            notes: Patch::Set("x".repeat(MAX_NOTES_LENGTH as usize + 1)),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
        assert!(UpdateCarModDto::default().validate().is_ok());
    }

    #[test]
    fn test_status_tree_serializes_flat_status_with_children() {
        let node = TreeNode {
            item: ModStatus {
                modification: catalog_mod("engine", None),
                car_mod: None,
                is_completed: false,
                is_unlocked: true,
            },
            children: vec![TreeNode {
                item: ModStatus {
                    modification: catalog_mod("cai", Some("engine")),
                    car_mod: None,
                    is_completed: false,
                    is_unlocked: false,
                },
                children: Vec::new(),
            }],
        };

        let json = serde_json::to_value(ModStatusTreeDto::from(node)).unwrap();
        assert_eq!(json["mod"]["id"], "engine");
        assert_eq!(json["is_unlocked"], true);
        assert!(json["car_mod"].is_null());
        assert_eq!(json["children"][0]["mod"]["parent_mod_id"], "engine");
        assert_eq!(json["children"][0]["is_unlocked"], false);
    }
}
