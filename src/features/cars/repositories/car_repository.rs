use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::database::handle_db_error;
use crate::core::error::Result;
use crate::features::cars::models::Car;

/// Persistence boundary for garages
#[async_trait]
pub trait CarRepository: Send + Sync {
    /// A user's cars, newest first
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Car>>;

    async fn get(&self, id: &str) -> Result<Option<Car>>;

    async fn insert(&self, car: &Car) -> Result<Car>;

    /// Overwrite the stored row; `None` when no row has that id
    async fn update(&self, car: &Car) -> Result<Option<Car>>;

    /// Removes the car and its ledger rows; false when no row has that id
    async fn delete(&self, id: &str) -> Result<bool>;
}

const CAR_COLUMNS: &str = "id, user_id, make, model, color, year, image_url, created_at, updated_at";

pub struct PgCarRepository {
    pool: PgPool,
}

impl PgCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarRepository for PgCarRepository {
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Car>> {
        let query = format!(
            "SELECT {} FROM cars WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            CAR_COLUMNS
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Garage"))
    }

    async fn get(&self, id: &str) -> Result<Option<Car>> {
        let query = format!("SELECT {} FROM cars WHERE id = $1", CAR_COLUMNS);
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Car"))
    }

    async fn insert(&self, car: &Car) -> Result<Car> {
        let query = format!(
            r#"
            INSERT INTO cars (id, user_id, make, model, color, year, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            CAR_COLUMNS
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(&car.id)
            .bind(&car.user_id)
            .bind(&car.make)
            .bind(&car.model)
            .bind(&car.color)
            .bind(car.year)
            .bind(&car.image_url)
            .bind(car.created_at)
            .bind(car.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Car"))
    }

    async fn update(&self, car: &Car) -> Result<Option<Car>> {
        let query = format!(
            r#"
            UPDATE cars
            SET make = $2,
                model = $3,
                color = $4,
                year = $5,
                image_url = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING {}
            "#,
            CAR_COLUMNS
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(&car.id)
            .bind(&car.make)
            .bind(&car.model)
            .bind(&car.color)
            .bind(car.year)
            .bind(&car.image_url)
            .bind(car.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Car"))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        // car_mods rows go with the car via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Car"))?;

        Ok(result.rows_affected() > 0)
    }
}
