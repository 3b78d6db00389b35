use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::database::handle_db_error;
use crate::core::error::Result;
use crate::features::mods::models::Mod;

/// Persistence boundary for the mod catalog
#[async_trait]
pub trait ModRepository: Send + Sync {
    /// Every mod in the catalog, ordered by name
    async fn list_all(&self) -> Result<Vec<Mod>>;

    async fn get(&self, id: &str) -> Result<Option<Mod>>;

    async fn list_by_category(&self, category: &str) -> Result<Vec<Mod>>;

    async fn list_children(&self, parent_id: &str) -> Result<Vec<Mod>>;

    async fn insert(&self, new_mod: &Mod) -> Result<Mod>;

    /// Overwrite the stored row; `None` when no row has that id
    async fn update(&self, updated: &Mod) -> Result<Option<Mod>>;

    /// Returns false when no row has that id
    async fn delete(&self, id: &str) -> Result<bool>;
}

const MOD_COLUMNS: &str =
    "id, name, description, parent_mod_id, category, image_url, created_at, updated_at";

pub struct PgModRepository {
    pool: PgPool,
}

impl PgModRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModRepository for PgModRepository {
    async fn list_all(&self) -> Result<Vec<Mod>> {
        let query = format!("SELECT {} FROM mods ORDER BY name, id", MOD_COLUMNS);
        sqlx::query_as::<_, Mod>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Mod catalog"))
    }

    async fn get(&self, id: &str) -> Result<Option<Mod>> {
        let query = format!("SELECT {} FROM mods WHERE id = $1", MOD_COLUMNS);
        sqlx::query_as::<_, Mod>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Mod"))
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Mod>> {
        let query = format!(
            "SELECT {} FROM mods WHERE category = $1 ORDER BY name, id",
            MOD_COLUMNS
        );
        sqlx::query_as::<_, Mod>(&query)
            .bind(category)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Mod catalog"))
    }

    async fn list_children(&self, parent_id: &str) -> Result<Vec<Mod>> {
        let query = format!(
            "SELECT {} FROM mods WHERE parent_mod_id = $1 ORDER BY name, id",
            MOD_COLUMNS
        );
        sqlx::query_as::<_, Mod>(&query)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Mod catalog"))
    }

    async fn insert(&self, new_mod: &Mod) -> Result<Mod> {
        let query = format!(
            r#"
            INSERT INTO mods (id, name, description, parent_mod_id, category, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            MOD_COLUMNS
        );
        sqlx::query_as::<_, Mod>(&query)
            .bind(&new_mod.id)
            .bind(&new_mod.name)
            .bind(&new_mod.description)
            .bind(&new_mod.parent_mod_id)
            .bind(&new_mod.category)
            .bind(&new_mod.image_url)
            .bind(new_mod.created_at)
            .bind(new_mod.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Mod"))
    }

    async fn update(&self, updated: &Mod) -> Result<Option<Mod>> {
        let query = format!(
            r#"
            UPDATE mods
            SET name = $2,
                description = $3,
                parent_mod_id = $4,
                category = $5,
                image_url = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING {}
            "#,
            MOD_COLUMNS
        );
        sqlx::query_as::<_, Mod>(&query)
            .bind(&updated.id)
            .bind(&updated.name)
            .bind(&updated.description)
            .bind(&updated.parent_mod_id)
            .bind(&updated.category)
            .bind(&updated.image_url)
            .bind(updated.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Mod"))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM mods WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Mod"))?;

        Ok(result.rows_affected() > 0)
    }
}
