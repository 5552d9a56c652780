use serde::Serialize;
use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

/// A recorded menstruation episode. `end_date = None` means still open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CycleInterval {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: Date,
    pub end_date: Option<Date>,
}

impl CycleInterval {
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    pub fn contains(&self, date: Date) -> bool {
        match self.end_date {
            Some(end) => self.start_date <= date && date <= end,
            None => false,
        }
    }
}
