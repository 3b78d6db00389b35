use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::core::database::handle_db_error;
use crate::core::error::Result;
use crate::features::car_mods::models::CarModEntry;

/// Persistence boundary for the per-car mod ledger
#[async_trait]
pub trait CarModRepository: Send + Sync {
    async fn list_for_car(&self, car_id: &str) -> Result<Vec<CarModEntry>>;

    async fn get(&self, car_id: &str, mod_id: &str) -> Result<Option<CarModEntry>>;

    /// Insert, or overwrite the row already holding `(car_id, mod_id)`.
    ///
    /// An existing row keeps its `id` and `created_at`.
    async fn upsert(&self, entry: &CarModEntry) -> Result<CarModEntry>;

    /// Stamp `completed` as the completion time in one write.
    ///
    /// A new row is created from `car_id`, `mod_id`, `notes` and `new_id`.
    /// An existing row keeps its notes unless `notes` is given.
    async fn complete(
        &self,
        car_id: &str,
        mod_id: &str,
        new_id: &str,
        notes: Option<&str>,
        completed: DateTime<Utc>,
    ) -> Result<CarModEntry>;

    /// Returns false when there is no row for the pair
    async fn delete(&self, car_id: &str, mod_id: &str) -> Result<bool>;
}

const CAR_MOD_COLUMNS: &str = "id, car_id, mod_id, completed_at, notes, created_at, updated_at";

pub struct PgCarModRepository {
    pool: PgPool,
}

impl PgCarModRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarModRepository for PgCarModRepository {
    async fn list_for_car(&self, car_id: &str) -> Result<Vec<CarModEntry>> {
        let query = format!(
            "SELECT {} FROM car_mods WHERE car_id = $1 ORDER BY created_at, id",
            CAR_MOD_COLUMNS
        );
        sqlx::query_as::<_, CarModEntry>(&query)
            .bind(car_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Car mod ledger"))
    }

    async fn get(&self, car_id: &str, mod_id: &str) -> Result<Option<CarModEntry>> {
        let query = format!(
            "SELECT {} FROM car_mods WHERE car_id = $1 AND mod_id = $2",
            CAR_MOD_COLUMNS
        );
        sqlx::query_as::<_, CarModEntry>(&query)
            .bind(car_id)
            .bind(mod_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Car mod"))
    }

    async fn upsert(&self, entry: &CarModEntry) -> Result<CarModEntry> {
        let query = format!(
            r#"
            INSERT INTO car_mods (id, car_id, mod_id, completed_at, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (car_id, mod_id) DO UPDATE
            SET completed_at = EXCLUDED.completed_at,
                notes = EXCLUDED.notes,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            CAR_MOD_COLUMNS
        );
        sqlx::query_as::<_, CarModEntry>(&query)
            .bind(&entry.id)
            .bind(&entry.car_id)
            .bind(&entry.mod_id)
            .bind(entry.completed_at)
            .bind(&entry.notes)
            .bind(entry.created_at)
            .bind(entry.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Car mod"))
    }

    async fn complete(
        &self,
        car_id: &str,
        mod_id: &str,
        new_id: &str,
        notes: Option<&str>,
        completed: DateTime<Utc>,
    ) -> Result<CarModEntry> {
        let query = format!(
            r#"
            INSERT INTO car_mods (id, car_id, mod_id, completed_at, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $4, NULL)
            ON CONFLICT (car_id, mod_id) DO UPDATE
            SET completed_at = EXCLUDED.completed_at,
                notes = COALESCE(EXCLUDED.notes, car_mods.notes),
                updated_at = EXCLUDED.completed_at
            RETURNING {}
            "#,
            CAR_MOD_COLUMNS
        );
        sqlx::query_as::<_, CarModEntry>(&query)
            .bind(new_id)
            .bind(car_id)
            .bind(mod_id)
            .bind(completed)
            .bind(notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Car mod"))
    }

    async fn delete(&self, car_id: &str, mod_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM car_mods WHERE car_id = $1 AND mod_id = $2")
            .bind(car_id)
            .bind(mod_id)
            .execute(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Car mod"))?;

        Ok(result.rows_affected() > 0)
    }
}
