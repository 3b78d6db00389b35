use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a car in a user's garage
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Car {
    pub id: String,
    pub user_id: String,
    pub make: String,
    pub model: String,
    pub color: String,
    pub year: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
