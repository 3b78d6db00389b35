use crate::features::car_mods::models::CarModEntry;
use crate::features::mods::models::Mod;
use crate::shared::tree::{TreeItem, TreeNode};

/// A catalog mod annotated with one car's progress. Derived per query.
#[derive(Debug, Clone, PartialEq)]
pub struct ModStatus {
    pub modification: Mod,
    pub car_mod: Option<CarModEntry>,
    pub is_completed: bool,
    pub is_unlocked: bool,
}

impl ModStatus {
    pub fn is_locked(&self) -> bool {
        !self.is_unlocked
    }
}

impl TreeItem for ModStatus {
    fn node_id(&self) -> &str {
        &self.modification.id
    }

    fn parent_node_id(&self) -> Option<&str> {
        self.modification.parent_mod_id.as_deref()
    }
}

pub type ModStatusTree = TreeNode<ModStatus>;
