use serde::Serialize;
use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

/// Cycle-related subset of the user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct CycleProfile {
    pub user_id: Uuid,
    pub cycle_length_days: Option<i32>,
    pub last_menstruation_start: Option<Date>,
    pub region_code: Option<String>,
}
