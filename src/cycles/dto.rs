use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::repo_types::CycleInterval;
use crate::scoring::RecalcSummary;

#[derive(Debug, Deserialize)]
pub struct CreateCycleRequest {
    pub start_date: Date,
    pub end_date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct CloseCycleRequest {
    pub end_date: Date,
}

/// Absent fields keep their stored value; an interval cannot be re-opened.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCycleRequest {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct CycleListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 { 12 }

#[derive(Debug, Serialize)]
pub struct CycleResponse {
    pub id: Uuid,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub is_open: bool,
}

impl From<CycleInterval> for CycleResponse {
    fn from(c: CycleInterval) -> Self {
        Self {
            is_open: c.is_open(),
            id: c.id,
            start_date: c.start_date,
            end_date: c.end_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CycleMutationResponse {
    pub interval: CycleResponse,
    pub recalculation: RecalcSummary,
}
