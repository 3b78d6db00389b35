use crate::core::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

/// Map unique/foreign-key violations to user-facing errors
pub fn handle_db_error(e: sqlx::Error, what: &str) -> crate::core::error::AppError {
    use crate::core::error::AppError;

    if let sqlx::Error::Database(db_err) = &e {
        // PostgreSQL unique_violation
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return AppError::Conflict(format!("{} already exists", what));
        }

        // PostgreSQL foreign_key_violation
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23503")) {
            return AppError::BadRequest(format!(
                "{} references a record that does not exist",
                what
            ));
        }
    }

    tracing::error!("Database error on {}: {:?}", what, e);
    AppError::Database(e)
}
