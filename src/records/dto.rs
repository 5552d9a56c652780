use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::DailyInputRow;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecordRequest {
    pub date: Date,
    pub skin_condition: i16,
    pub sleep: i16,
    pub stress: i16,
    pub skincare_effort: i16,
    #[serde(default)]
    pub menstruation_self_report: bool,
    pub water_intake: Option<i32>,
    pub memo: Option<String>,
    pub region_code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRecordRequest {
    pub skin_condition: Option<i16>,
    pub sleep: Option<i16>,
    pub stress: Option<i16>,
    pub skincare_effort: Option<i16>,
    pub menstruation_self_report: Option<bool>,
    pub water_intake: Option<i32>,
    pub memo: Option<String>,
    pub region_code: Option<String>,
}

impl UpdateRecordRequest {
    pub fn is_empty(&self) -> bool {
        self.skin_condition.is_none()
            && self.sleep.is_none()
            && self.stress.is_none()
            && self.skincare_effort.is_none()
            && self.menstruation_self_report.is_none()
            && self.water_intake.is_none()
            && self.memo.is_none()
            && self.region_code.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordListQuery {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 { 30 }

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: Uuid,
    pub date: Date,
    pub skin_condition: Option<i16>,
    pub sleep: Option<i16>,
    pub stress: Option<i16>,
    pub skincare_effort: Option<i16>,
    pub menstruation_self_report: bool,
    pub water_intake: Option<i32>,
    pub memo: Option<String>,
    pub region_code: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Present on writes: the freshly computed daily score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_score: Option<i32>,
}

impl From<DailyInputRow> for RecordResponse {
    fn from(r: DailyInputRow) -> Self {
        Self {
            id: r.id,
            date: r.date,
            skin_condition: r.skin_condition,
            sleep: r.sleep,
            stress: r.stress,
            skincare_effort: r.skincare_effort,
            menstruation_self_report: r.menstruation_self_report,
            water_intake: r.water_intake,
            memo: r.memo,
            region_code: r.region_code,
            created_at: r.created_at,
            updated_at: r.updated_at,
            composite_score: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordListResponse {
    pub records: Vec<RecordResponse>,
    pub total: usize,
}
