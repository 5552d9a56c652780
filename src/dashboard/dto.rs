use serde::{Deserialize, Serialize};
use time::Date;

use crate::scoring::types::{AxisDetails, DailyScore};

#[derive(Debug, Deserialize)]
pub struct RadarQuery {
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub date: Date,
}

#[derive(Debug, Serialize)]
pub struct SkinScoreResponse {
    pub date: Date,
    pub composite_score: i32,
    pub axis_details: AxisDetails,
}

impl From<DailyScore> for SkinScoreResponse {
    fn from(s: DailyScore) -> Self {
        Self {
            date: s.date,
            composite_score: s.composite_score,
            axis_details: s.axis_details,
        }
    }
}
