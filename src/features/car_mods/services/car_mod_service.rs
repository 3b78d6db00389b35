use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::car_mods::dtos::{MarkCompletedDto, UpdateCarModDto};
use crate::features::car_mods::models::{CarModEntry, ModStatus, ModStatusTree};
use crate::features::car_mods::repositories::CarModRepository;
use crate::features::car_mods::resolver::resolve_statuses;
use crate::features::cars::repositories::CarRepository;
use crate::features::mods::models::catalog::compare_by_name;
use crate::features::mods::repositories::ModRepository;
use crate::shared::clock::Clock;
use crate::shared::tree::{build_forest, sort_forest_by, TreeNode};

fn compare_status(a: &ModStatus, b: &ModStatus) -> std::cmp::Ordering {
    compare_by_name(&a.modification, &b.modification)
}

/// Service for a car's mod progress: the ledger plus derived unlock status
pub struct CarModService {
    mods: Arc<dyn ModRepository>,
    car_mods: Arc<dyn CarModRepository>,
    cars: Arc<dyn CarRepository>,
    clock: Arc<dyn Clock>,
}

impl CarModService {
    pub fn new(
        mods: Arc<dyn ModRepository>,
        car_mods: Arc<dyn CarModRepository>,
        cars: Arc<dyn CarRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            mods,
            car_mods,
            cars,
            clock,
        }
    }

    /// Raw ledger rows for a car
    pub async fn list_entries(&self, car_id: &str) -> Result<Vec<CarModEntry>> {
        self.require_car(car_id).await?;
        self.car_mods.list_for_car(car_id).await
    }

    /// Ledger row for one mod; `None` when the car never touched it
    pub async fn get_entry(&self, car_id: &str, mod_id: &str) -> Result<Option<CarModEntry>> {
        self.require_car(car_id).await?;
        self.car_mods.get(car_id, mod_id).await
    }

    /// Every catalog mod with this car's completion and unlock state,
    /// sorted by name
    pub async fn mods_with_status(&self, car_id: &str) -> Result<Vec<ModStatus>> {
        let mut statuses = self.resolve_for_car(car_id).await?;
        statuses.sort_by(compare_status);

        tracing::debug!(
            "Resolved {} mod statuses for car {} ({} locked)",
            statuses.len(),
            car_id,
            statuses.iter().filter(|s| s.is_locked()).count()
        );
        Ok(statuses)
    }

    /// Status forest for a car.
    ///
    /// With `roots_only`, the root mods come back as a flat list with empty
    /// children. Otherwise the full hierarchy is built; mods whose ancestry
    /// cannot be resolved are left out.
    pub async fn mod_tree_with_status(
        &self,
        car_id: &str,
        roots_only: bool,
    ) -> Result<Vec<ModStatusTree>> {
        let statuses = self.resolve_for_car(car_id).await?;

        let mut roots: Vec<ModStatusTree> = if roots_only {
            statuses
                .into_iter()
                .filter(|s| s.modification.is_root())
                .map(|item| TreeNode {
                    item,
                    children: Vec::new(),
                })
                .collect()
        } else {
            let forest = build_forest(statuses)?;
            for detached in &forest.detached {
                tracing::warn!(
                    "Mod {} left out of status tree for car {}: ancestor {} does not exist",
                    detached.id,
                    car_id,
                    detached.missing_ancestor_id
                );
            }
            forest.roots
        };

        sort_forest_by(&mut roots, &compare_status);
        Ok(roots)
    }

    /// Mark a mod completed on a car, creating the ledger row if needed.
    ///
    /// Notes are only overwritten when supplied.
    pub async fn mark_completed(
        &self,
        car_id: &str,
        mod_id: &str,
        dto: MarkCompletedDto,
    ) -> Result<CarModEntry> {
        self.require_car_and_mod(car_id, mod_id).await?;

        let new_id = Uuid::now_v7().to_string();
        let saved = self
            .car_mods
            .complete(
                car_id,
                mod_id,
                &new_id,
                dto.notes.as_deref(),
                self.clock.now(),
            )
            .await?;
        tracing::info!(
            "Mod marked completed: car_id={}, mod_id={}, entry_id={}",
            car_id,
            mod_id,
            saved.id
        );

        Ok(saved)
    }

    /// Clear the completion timestamp. The row itself is kept.
    pub async fn mark_incomplete(&self, car_id: &str, mod_id: &str) -> Result<CarModEntry> {
        self.require_car_and_mod(car_id, mod_id).await?;

        let mut entry = self.require_entry(car_id, mod_id).await?;
        entry.completed_at = None;
        entry.updated_at = Some(self.clock.now());

        let saved = self.car_mods.upsert(&entry).await?;
        tracing::info!(
            "Mod marked incomplete: car_id={}, mod_id={}",
            car_id,
            mod_id
        );

        Ok(saved)
    }

    pub async fn update_entry(
        &self,
        car_id: &str,
        mod_id: &str,
        dto: UpdateCarModDto,
    ) -> Result<CarModEntry> {
        self.require_car(car_id).await?;

        let current = self.require_entry(car_id, mod_id).await?;
        let updated = dto.apply_to(current, self.clock.now());

        let saved = self.car_mods.upsert(&updated).await?;
        tracing::info!("Car mod updated: car_id={}, mod_id={}", car_id, mod_id);

        Ok(saved)
    }

    pub async fn delete_entry(&self, car_id: &str, mod_id: &str) -> Result<()> {
        self.require_car(car_id).await?;

        if !self.car_mods.delete(car_id, mod_id).await? {
            return Err(AppError::NotFound(format!(
                "Mod '{}' has no entry on car '{}'",
                mod_id, car_id
            )));
        }

        tracing::info!("Car mod deleted: car_id={}, mod_id={}", car_id, mod_id);
        Ok(())
    }

    /// Catalog and ledger are fetched together; either failing fails the query
    async fn resolve_for_car(&self, car_id: &str) -> Result<Vec<ModStatus>> {
        self.require_car(car_id).await?;

        let (all_mods, entries) = tokio::try_join!(
            self.mods.list_all(),
            self.car_mods.list_for_car(car_id)
        )?;

        Ok(resolve_statuses(all_mods, entries))
    }

    async fn require_car(&self, car_id: &str) -> Result<()> {
        match self.cars.get(car_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Car '{}' not found", car_id))),
        }
    }

    async fn require_car_and_mod(&self, car_id: &str, mod_id: &str) -> Result<()> {
        let (car, modification) = tokio::try_join!(self.cars.get(car_id), self.mods.get(mod_id))?;

        if car.is_none() {
            return Err(AppError::NotFound(format!("Car '{}' not found", car_id)));
        }
        if modification.is_none() {
            return Err(AppError::NotFound(format!("Mod '{}' not found", mod_id)));
        }
        Ok(())
    }

    async fn require_entry(&self, car_id: &str, mod_id: &str) -> Result<CarModEntry> {
        self.car_mods.get(car_id, mod_id).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "Mod '{}' has no entry on car '{}'",
                mod_id, car_id
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::mods::models::Mod;
    use crate::shared::patch::Patch;
    use crate::shared::test_helpers::{create_mod_dto, TestContext};
    use async_trait::async_trait;

    struct Garage {
        ctx: TestContext,
        car_id: String,
        engine: Mod,
        intake: Mod,
        tune: Mod,
    }

    /// Engine with two children, plus one car
    async fn garage() -> Garage {
        let ctx = TestContext::new();
        let car_id = ctx.create_car("user-1").await.id;
        let engine = ctx.mod_service.create(create_mod_dto("Engine", None)).await.unwrap();
        let intake = ctx
            .mod_service
            .create(create_mod_dto("Cold Air Intake", Some(&engine.id)))
            .await
            .unwrap();
        let tune = ctx
            .mod_service
            .create(create_mod_dto("ECU Tune", Some(&engine.id)))
            .await
            .unwrap();

        Garage {
            ctx,
            car_id,
            engine,
            intake,
            tune,
        }
    }

    fn find<'a>(statuses: &'a [ModStatus], id: &str) -> &'a ModStatus {
        statuses
            .iter()
            .find(|s| s.modification.id == id)
            .unwrap_or_else(|| panic!("no status for {}", id))
    }

    #[tokio::test]
    async fn test_completing_root_unlocks_children() {
        let g = garage().await;
        let service = &g.ctx.car_mod_service;

        let before = service.mods_with_status(&g.car_id).await.unwrap();
        assert!(find(&before, &g.engine.id).is_unlocked);
        assert!(find(&before, &g.intake.id).is_locked());
        assert!(find(&before, &g.tune.id).is_locked());

        let entry = service
            .mark_completed(&g.car_id, &g.engine.id, MarkCompletedDto::default())
            .await
            .unwrap();
        assert_eq!(entry.completed_at, Some(g.ctx.start));
        assert_eq!(entry.created_at, g.ctx.start);

        let after = service.mods_with_status(&g.car_id).await.unwrap();
        assert!(find(&after, &g.engine.id).is_completed);
        assert!(find(&after, &g.intake.id).is_unlocked);
        assert!(find(&after, &g.tune.id).is_unlocked);

        service.mark_incomplete(&g.car_id, &g.engine.id).await.unwrap();
        let relocked = service.mods_with_status(&g.car_id).await.unwrap();
        assert!(!find(&relocked, &g.engine.id).is_completed);
        assert!(find(&relocked, &g.engine.id).car_mod.is_some());
        assert!(find(&relocked, &g.intake.id).is_locked());
    }

    #[tokio::test]
    async fn test_status_list_is_sorted_by_name() {
        let g = garage().await;
        let statuses = g.ctx.car_mod_service.mods_with_status(&g.car_id).await.unwrap();
        let names: Vec<_> = statuses
            .iter()
            .map(|s| s.modification.name.as_str())
            .collect();
        assert_eq!(names, vec!["Cold Air Intake", "ECU Tune", "Engine"]);
    }

    #[tokio::test]
    async fn test_mark_completed_twice_keeps_single_entry() {
        let g = garage().await;
        let service = &g.ctx.car_mod_service;

        let first = service
            .mark_completed(
                &g.car_id,
                &g.engine.id,
                MarkCompletedDto {
                    notes: Some("Stage 1".to_string()),
                },
            )
            .await
            .unwrap();

        g.ctx.clock.advance(chrono::Duration::minutes(10));
        let second = service
            .mark_completed(&g.car_id, &g.engine.id, MarkCompletedDto::default())
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(
            second.completed_at,
            Some(g.ctx.start + chrono::Duration::minutes(10))
        );
        assert_eq!(second.updated_at, second.completed_at);
        assert_eq!(second.notes.as_deref(), Some("Stage 1"));

        let entries = service.list_entries(&g.car_id).await.unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_incomplete_without_entry_is_not_found() {
        let g = garage().await;
        let result = g
            .ctx
            .car_mod_service
            .mark_incomplete(&g.car_id, &g.engine.id)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unknown_car_or_mod_is_not_found() {
        let g = garage().await;
        let service = &g.ctx.car_mod_service;

        let no_car = service
            .mark_completed("ghost-car", &g.engine.id, MarkCompletedDto::default())
            .await;
        assert!(matches!(no_car, Err(AppError::NotFound(_))));

        let no_mod = service
            .mark_completed(&g.car_id, "ghost-mod", MarkCompletedDto::default())
            .await;
        assert!(matches!(no_mod, Err(AppError::NotFound(_))));

        let no_status = service.mods_with_status("ghost-car").await;
        assert!(matches!(no_status, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_entry_absent_is_none() {
        let g = garage().await;
        let entry = g
            .ctx
            .car_mod_service
            .get_entry(&g.car_id, &g.engine.id)
            .await
            .unwrap();
        assert!(entry.is_none());
    }

    #[tokio::test]
    async fn test_update_entry_patch_semantics() {
        let g = garage().await;
        let service = &g.ctx.car_mod_service;
        service
            .mark_completed(
                &g.car_id,
                &g.engine.id,
                MarkCompletedDto {
                    notes: Some("Stage 1".to_string()),
                },
            )
            .await
            .unwrap();

        // Omitted completed_at is kept, null notes are cleared
        let updated = service
            .update_entry(
                &g.car_id,
                &g.engine.id,
                UpdateCarModDto {
                    notes: Patch::Clear,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.completed_at, Some(g.ctx.start));
        assert!(updated.notes.is_none());

        let reopened = service
            .update_entry(
                &g.car_id,
                &g.engine.id,
                UpdateCarModDto {
                    completed_at: Patch::Clear,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(reopened.completed_at.is_none());

        let statuses = service.mods_with_status(&g.car_id).await.unwrap();
        assert!(find(&statuses, &g.intake.id).is_locked());

        let missing = service
            .update_entry(&g.car_id, &g.tune.id, UpdateCarModDto::default())
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let g = garage().await;
        let service = &g.ctx.car_mod_service;
        service
            .mark_completed(&g.car_id, &g.engine.id, MarkCompletedDto::default())
            .await
            .unwrap();

        service.delete_entry(&g.car_id, &g.engine.id).await.unwrap();
        assert!(service
            .get_entry(&g.car_id, &g.engine.id)
            .await
            .unwrap()
            .is_none());

        let again = service.delete_entry(&g.car_id, &g.engine.id).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_deleting_mod_drops_its_ledger_rows() {
        let g = garage().await;
        let service = &g.ctx.car_mod_service;
        service
            .mark_completed(&g.car_id, &g.engine.id, MarkCompletedDto::default())
            .await
            .unwrap();
        service
            .mark_completed(&g.car_id, &g.tune.id, MarkCompletedDto::default())
            .await
            .unwrap();

        g.ctx.mod_service.delete(&g.tune.id).await.unwrap();

        let entries = service.list_entries(&g.car_id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mod_id, g.engine.id);
    }

    #[tokio::test]
    async fn test_tree_nests_and_sorts() {
        let g = garage().await;
        let service = &g.ctx.car_mod_service;
        service
            .mark_completed(&g.car_id, &g.engine.id, MarkCompletedDto::default())
            .await
            .unwrap();

        let tree = service.mod_tree_with_status(&g.car_id, false).await.unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].item.modification.id, g.engine.id);
        assert!(tree[0].item.is_completed);

        let children: Vec<_> = tree[0]
            .children
            .iter()
            .map(|c| (c.item.modification.name.as_str(), c.item.is_unlocked))
            .collect();
        assert_eq!(children, vec![("Cold Air Intake", true), ("ECU Tune", true)]);

        let roots = service.mod_tree_with_status(&g.car_id, true).await.unwrap();
        assert_eq!(roots.len(), 1);
        assert!(roots[0].children.is_empty());
    }

    #[tokio::test]
    async fn test_tree_excludes_mods_with_missing_ancestor() {
        let g = garage().await;
        let mut stray = crate::features::mods::models::catalog::fixtures::catalog_mod(
            "stray",
            Some("ghost"),
        );
        stray.created_at = g.ctx.start;
        ModRepository::insert(g.ctx.store.as_ref(), &stray)
            .await
            .unwrap();

        let statuses = g.ctx.car_mod_service.mods_with_status(&g.car_id).await.unwrap();
        assert_eq!(statuses.len(), 4);
        assert!(find(&statuses, "stray").is_locked());

        let tree = g
            .ctx
            .car_mod_service
            .mod_tree_with_status(&g.car_id, false)
            .await
            .unwrap();
        let attached: usize = tree.iter().map(TreeNode::size).sum();
        assert_eq!(attached, 3);
    }

    #[tokio::test]
    async fn test_cyclic_catalog_fails_tree_but_not_flat_list() {
        let g = garage().await;
        let mut looped = g.engine.clone();
        looped.parent_mod_id = Some(g.intake.id.clone());
        ModRepository::update(g.ctx.store.as_ref(), &looped)
            .await
            .unwrap();

        let tree = g
            .ctx
            .car_mod_service
            .mod_tree_with_status(&g.car_id, false)
            .await;
        assert!(matches!(tree, Err(AppError::Integrity(_))));

        let statuses = g.ctx.car_mod_service.mods_with_status(&g.car_id).await.unwrap();
        assert_eq!(statuses.len(), 3);
        assert!(statuses.iter().all(ModStatus::is_locked));
    }

    struct UnreachableCatalog;

    #[async_trait]
    impl ModRepository for UnreachableCatalog {
        async fn list_all(&self) -> Result<Vec<Mod>> {
            Err(AppError::ExternalServiceError("catalog unavailable".to_string()))
        }

        async fn get(&self, _id: &str) -> Result<Option<Mod>> {
            Err(AppError::ExternalServiceError("catalog unavailable".to_string()))
        }

        async fn list_by_category(&self, _category: &str) -> Result<Vec<Mod>> {
            Err(AppError::ExternalServiceError("catalog unavailable".to_string()))
        }

        async fn list_children(&self, _parent_id: &str) -> Result<Vec<Mod>> {
            Err(AppError::ExternalServiceError("catalog unavailable".to_string()))
        }

        async fn insert(&self, _new_mod: &Mod) -> Result<Mod> {
            Err(AppError::ExternalServiceError("catalog unavailable".to_string()))
        }

        async fn update(&self, _updated: &Mod) -> Result<Option<Mod>> {
            Err(AppError::ExternalServiceError("catalog unavailable".to_string()))
        }

        async fn delete(&self, _id: &str) -> Result<bool> {
            Err(AppError::ExternalServiceError("catalog unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_catalog_failure_fails_status_query() {
        let ctx = TestContext::new();
        let car_id = ctx.create_car("user-1").await.id;

        let service = CarModService::new(
            Arc::new(UnreachableCatalog),
            ctx.store.clone(),
            ctx.store.clone(),
            ctx.clock.clone(),
        );

        let result = service.mods_with_status(&car_id).await;
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));

        let tree = service.mod_tree_with_status(&car_id, false).await;
        assert!(matches!(tree, Err(AppError::ExternalServiceError(_))));
    }
}
