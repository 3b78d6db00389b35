//! HashMap-backed store behind a single async lock
//!
//! The ledger is keyed by `(car_id, mod_id)`, so an upsert is one map write
//! under the write lock and two concurrent completions of the same pair can
//! never produce two rows. Deleting a car or a mod drops its ledger rows, the
//! same as the Postgres foreign keys do.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::car_mods::models::CarModEntry;
use crate::features::car_mods::repositories::CarModRepository;
use crate::features::cars::models::Car;
use crate::features::cars::repositories::CarRepository;
use crate::features::mods::models::Mod;
use crate::features::mods::repositories::ModRepository;

type LedgerKey = (String, String);

#[derive(Default)]
struct Tables {
    cars: HashMap<String, Car>,
    mods: HashMap<String, Mod>,
    car_mods: HashMap<LedgerKey, CarModEntry>,
}

/// In-memory implementation of the car, mod and ledger repositories
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_name(mut mods: Vec<Mod>) -> Vec<Mod> {
    mods.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    mods
}

#[async_trait]
impl ModRepository for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Mod>> {
        let tables = self.tables.read().await;
        Ok(sorted_by_name(tables.mods.values().cloned().collect()))
    }

    async fn get(&self, id: &str) -> Result<Option<Mod>> {
        let tables = self.tables.read().await;
        Ok(tables.mods.get(id).cloned())
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Mod>> {
        let tables = self.tables.read().await;
        Ok(sorted_by_name(
            tables
                .mods
                .values()
                .filter(|m| m.category.as_deref() == Some(category))
                .cloned()
                .collect(),
        ))
    }

    async fn list_children(&self, parent_id: &str) -> Result<Vec<Mod>> {
        let tables = self.tables.read().await;
        Ok(sorted_by_name(
            tables
                .mods
                .values()
                .filter(|m| m.parent_mod_id.as_deref() == Some(parent_id))
                .cloned()
                .collect(),
        ))
    }

    async fn insert(&self, new_mod: &Mod) -> Result<Mod> {
        let mut tables = self.tables.write().await;
        if tables.mods.contains_key(&new_mod.id) {
            return Err(AppError::Conflict("Mod already exists".to_string()));
        }
        tables.mods.insert(new_mod.id.clone(), new_mod.clone());
        Ok(new_mod.clone())
    }

    async fn update(&self, updated: &Mod) -> Result<Option<Mod>> {
        let mut tables = self.tables.write().await;
        match tables.mods.get_mut(&updated.id) {
            Some(slot) => {
                *slot = updated.clone();
                Ok(Some(updated.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.mods.remove(id).is_none() {
            return Ok(false);
        }

        let before = tables.car_mods.len();
        tables.car_mods.retain(|(_, mod_id), _| mod_id != id);
        debug!(
            "Dropped {} ledger row(s) with mod {}",
            before - tables.car_mods.len(),
            id
        );
        Ok(true)
    }
}

#[async_trait]
impl CarModRepository for MemoryStore {
    async fn list_for_car(&self, car_id: &str) -> Result<Vec<CarModEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<CarModEntry> = tables
            .car_mods
            .values()
            .filter(|e| e.car_id == car_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }

    async fn get(&self, car_id: &str, mod_id: &str) -> Result<Option<CarModEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .car_mods
            .get(&(car_id.to_string(), mod_id.to_string()))
            .cloned())
    }

    async fn upsert(&self, entry: &CarModEntry) -> Result<CarModEntry> {
        let mut tables = self.tables.write().await;
        if !tables.cars.contains_key(&entry.car_id) || !tables.mods.contains_key(&entry.mod_id) {
            return Err(AppError::BadRequest(
                "Car mod references a record that does not exist".to_string(),
            ));
        }

        let key = (entry.car_id.clone(), entry.mod_id.clone());
        let saved = match tables.car_mods.get(&key) {
            Some(existing) => CarModEntry {
                id: existing.id.clone(),
                created_at: existing.created_at,
                ..entry.clone()
            },
            None => entry.clone(),
        };
        tables.car_mods.insert(key, saved.clone());
        Ok(saved)
    }

    async fn complete(
        &self,
        car_id: &str,
        mod_id: &str,
        new_id: &str,
        notes: Option<&str>,
        completed: DateTime<Utc>,
    ) -> Result<CarModEntry> {
        let mut tables = self.tables.write().await;
        if !tables.cars.contains_key(car_id) || !tables.mods.contains_key(mod_id) {
            return Err(AppError::BadRequest(
                "Car mod references a record that does not exist".to_string(),
            ));
        }

        let entry = tables
            .car_mods
            .entry((car_id.to_string(), mod_id.to_string()))
            .and_modify(|existing| {
                existing.completed_at = Some(completed);
                existing.updated_at = Some(completed);
                if let Some(notes) = notes {
                    existing.notes = Some(notes.to_string());
                }
            })
            .or_insert_with(|| CarModEntry {
                id: new_id.to_string(),
                car_id: car_id.to_string(),
                mod_id: mod_id.to_string(),
                completed_at: Some(completed),
                notes: notes.map(str::to_string),
                created_at: completed,
                updated_at: None,
            });
        Ok(entry.clone())
    }

    async fn delete(&self, car_id: &str, mod_id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .car_mods
            .remove(&(car_id.to_string(), mod_id.to_string()))
            .is_some())
    }
}

#[async_trait]
impl CarRepository for MemoryStore {
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Car>> {
        let tables = self.tables.read().await;
        let mut cars: Vec<Car> = tables
            .cars
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        cars.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(cars)
    }

    async fn get(&self, id: &str) -> Result<Option<Car>> {
        let tables = self.tables.read().await;
        Ok(tables.cars.get(id).cloned())
    }

    async fn insert(&self, car: &Car) -> Result<Car> {
        let mut tables = self.tables.write().await;
        if tables.cars.contains_key(&car.id) {
            return Err(AppError::Conflict("Car already exists".to_string()));
        }
        tables.cars.insert(car.id.clone(), car.clone());
        Ok(car.clone())
    }

    async fn update(&self, car: &Car) -> Result<Option<Car>> {
        let mut tables = self.tables.write().await;
        match tables.cars.get_mut(&car.id) {
            Some(slot) => {
                *slot = car.clone();
                Ok(Some(car.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.cars.remove(id).is_none() {
            return Ok(false);
        }
        tables.car_mods.retain(|(car_id, _), _| car_id != id);
        Ok(true)
    }
}
