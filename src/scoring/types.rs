use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::Date;
use uuid::Uuid;

/// The six contributing dimensions of a daily score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Sleep,
    Stress,
    SkincareEffort,
    Menstrual,
    Climate,
    SkinCondition,
}

impl Axis {
    pub const ALL: [Axis; 6] = [
        Axis::Sleep,
        Axis::Stress,
        Axis::SkincareEffort,
        Axis::Menstrual,
        Axis::Climate,
        Axis::SkinCondition,
    ];

    /// Axes that explain the skin condition rather than measure it.
    pub const DRIVERS: [Axis; 5] = [
        Axis::Sleep,
        Axis::Stress,
        Axis::SkincareEffort,
        Axis::Menstrual,
        Axis::Climate,
    ];
}

/// Per-axis values, each within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisDetails {
    pub sleep: u8,
    pub stress: u8,
    pub skincare_effort: u8,
    pub menstrual: u8,
    pub climate: u8,
    pub skin_condition: u8,
}

impl AxisDetails {
    pub fn get(&self, axis: Axis) -> u8 {
        match axis {
            Axis::Sleep => self.sleep,
            Axis::Stress => self.stress,
            Axis::SkincareEffort => self.skincare_effort,
            Axis::Menstrual => self.menstrual,
            Axis::Climate => self.climate,
            Axis::SkinCondition => self.skin_condition,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyScore {
    pub user_id: Uuid,
    pub date: Date,
    pub composite_score: i32,
    pub axis_details: AxisDetails,
}

impl DailyScore {
    pub fn same_values(&self, other: &DailyScore) -> bool {
        self.composite_score == other.composite_score && self.axis_details == other.axis_details
    }
}

#[derive(Debug, FromRow)]
pub struct DailyScoreRow {
    pub user_id: Uuid,
    pub date: Date,
    pub composite_score: i32,
    pub axis_details: Json<AxisDetails>,
}

impl From<DailyScoreRow> for DailyScore {
    fn from(r: DailyScoreRow) -> Self {
        Self {
            user_id: r.user_id,
            date: r.date,
            composite_score: r.composite_score,
            axis_details: r.axis_details.0,
        }
    }
}
