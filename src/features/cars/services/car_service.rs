use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::cars::dtos::{CreateCarDto, UpdateCarDto};
use crate::features::cars::models::Car;
use crate::features::cars::repositories::CarRepository;
use crate::shared::clock::Clock;

/// Service for garage operations
pub struct CarService {
    repo: Arc<dyn CarRepository>,
    clock: Arc<dyn Clock>,
}

impl CarService {
    pub fn new(repo: Arc<dyn CarRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Car>> {
        self.repo.list_by_user(user_id).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Car>> {
        self.repo.get(id).await
    }

    pub async fn create(&self, dto: CreateCarDto) -> Result<Car> {
        let car = Car {
            id: Uuid::now_v7().to_string(),
            user_id: dto.user_id.trim().to_string(),
            make: dto.make.trim().to_string(),
            model: dto.model.trim().to_string(),
            color: dto.color.trim().to_string(),
            year: dto.year,
            image_url: dto.image_url,
            created_at: self.clock.now(),
            updated_at: None,
        };

        let created = self.repo.insert(&car).await?;
        tracing::info!(
            "Car created: id={}, user_id={}, {} {} {}",
            created.id,
            created.user_id,
            created.year,
            created.make,
            created.model
        );

        Ok(created)
    }

    pub async fn update(&self, id: &str, dto: UpdateCarDto) -> Result<Car> {
        let current = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car '{}' not found", id)))?;

        let updated = dto.apply_to(current, self.clock.now());

        let saved = self
            .repo
            .update(&updated)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car '{}' not found", id)))?;

        tracing::info!("Car updated: id={}", saved.id);
        Ok(saved)
    }

    /// Remove a car together with its mod progress
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Car '{}' not found", id)));
        }

        tracing::info!("Car deleted: id={}", id);
        Ok(())
    }
}
