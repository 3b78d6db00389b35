use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Ledger row: progress of one mod on one car.
///
/// `(car_id, mod_id)` is a natural key; `completed_at = None` means the mod
/// was started (or un-marked) but is not complete.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CarModEntry {
    pub id: String,
    pub car_id: String,
    pub mod_id: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CarModEntry {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Most recent write to this row
    pub fn last_written_at(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}
