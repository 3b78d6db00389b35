use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::mods::dtos::{CreateModDto, ModQueryParams, UpdateModDto};
use crate::features::mods::models::catalog::compare_by_name;
use crate::features::mods::models::Mod;
use crate::features::mods::repositories::ModRepository;
use crate::shared::clock::Clock;
use crate::shared::tree::{build_forest, sort_forest_by, TreeNode};

/// Service for mod catalog operations
pub struct ModService {
    repo: Arc<dyn ModRepository>,
    clock: Arc<dyn Clock>,
}

impl ModService {
    pub fn new(repo: Arc<dyn ModRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// List mods, optionally filtered by category and/or to roots only
    pub async fn list(&self, params: &ModQueryParams) -> Result<Vec<Mod>> {
        let mods = match params.category.as_deref() {
            Some(category) => self.repo.list_by_category(category).await?,
            None => self.repo.list_all().await?,
        };

        if params.roots_only {
            Ok(mods.into_iter().filter(Mod::is_root).collect())
        } else {
            Ok(mods)
        }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Mod>> {
        self.repo.get(id).await
    }

    /// Direct children of a mod
    pub async fn list_children(&self, parent_id: &str) -> Result<Vec<Mod>> {
        if self.repo.get(parent_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Mod '{}' not found",
                parent_id
            )));
        }

        self.repo.list_children(parent_id).await
    }

    /// Whole catalog as a forest, sorted by name at every level
    pub async fn tree(&self) -> Result<Vec<TreeNode<Mod>>> {
        let mods = self.repo.list_all().await?;
        let forest = build_forest(mods)?;

        for detached in &forest.detached {
            tracing::warn!(
                "Mod {} left out of tree: ancestor {} does not exist",
                detached.id,
                detached.missing_ancestor_id
            );
        }

        tracing::debug!(
            "Mod tree assembled: roots={}, nodes={}",
            forest.roots.len(),
            forest.node_count()
        );

        let mut roots = forest.roots;
        sort_forest_by(&mut roots, &compare_by_name);
        Ok(roots)
    }

    pub async fn create(&self, dto: CreateModDto) -> Result<Mod> {
        if let Some(parent_id) = dto.parent_mod_id.as_deref() {
            if self.repo.get(parent_id).await?.is_none() {
                return Err(AppError::BadRequest(format!(
                    "Parent mod '{}' does not exist",
                    parent_id
                )));
            }
        }

        let new_mod = Mod {
            id: Uuid::now_v7().to_string(),
            name: dto.name.trim().to_string(),
            description: dto.description,
            parent_mod_id: dto.parent_mod_id,
            category: dto.category,
            image_url: dto.image_url,
            created_at: self.clock.now(),
            updated_at: None,
        };

        let created = self.repo.insert(&new_mod).await?;
        tracing::info!(
            "Mod created: id={}, name={}, parent={:?}",
            created.id,
            created.name,
            created.parent_mod_id
        );

        Ok(created)
    }

    pub async fn update(&self, id: &str, mut dto: UpdateModDto) -> Result<Mod> {
        let current = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mod '{}' not found", id)))?;

        if let Some(parent_id) = dto.parent_mod_id.as_set() {
            self.check_reparent(id, parent_id).await?;
        }

        dto.name = dto.name.map(|n| n.trim().to_string());
        let updated = dto.apply_to(current, self.clock.now());

        let saved = self
            .repo
            .update(&updated)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mod '{}' not found", id)))?;

        tracing::info!("Mod updated: id={}", saved.id);
        Ok(saved)
    }

    /// Delete a mod that has no children. Its ledger rows go with it.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let children = self.repo.list_children(id).await?;
        if !children.is_empty() {
            return Err(AppError::Conflict(format!(
                "Mod '{}' still has {} child mod(s); delete or re-parent them first",
                id,
                children.len()
            )));
        }

        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Mod '{}' not found", id)));
        }

        tracing::info!("Mod deleted: id={}", id);
        Ok(())
    }

    /// Moving `id` under `parent_id` must not close a loop
    async fn check_reparent(&self, id: &str, parent_id: &str) -> Result<()> {
        if parent_id == id {
            return Err(AppError::Conflict(
                "A mod cannot be its own parent".to_string(),
            ));
        }

        let catalog = self.repo.list_all().await?;
        let parents: HashMap<&str, Option<&str>> = catalog
            .iter()
            .map(|m| (m.id.as_str(), m.parent_mod_id.as_deref()))
            .collect();

        if !parents.contains_key(parent_id) {
            return Err(AppError::BadRequest(format!(
                "Parent mod '{}' does not exist",
                parent_id
            )));
        }

        if ancestors_include(&parents, parent_id, id) {
            return Err(AppError::Conflict(format!(
                "Moving mod '{}' under '{}' would create a cycle",
                id, parent_id
            )));
        }

        Ok(())
    }
}

/// Whether `target` is `start` or one of its ancestors
fn ancestors_include(parents: &HashMap<&str, Option<&str>>, start: &str, target: &str) -> bool {
    let mut seen = HashSet::new();
    let mut current = Some(start);

    while let Some(id) = current {
        if id == target {
            return true;
        }
        if !seen.insert(id) {
            // Already cyclic in storage; stop walking
            return false;
        }
        current = parents.get(id).copied().flatten();
    }

    false
}
