use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DailyInputRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub skin_condition: Option<i16>,
    pub sleep: Option<i16>,
    pub stress: Option<i16>,
    pub skincare_effort: Option<i16>,
    pub menstruation_self_report: bool,
    pub water_intake: Option<i32>,
    pub memo: Option<String>,
    pub region_code: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// The scoring view of a daily record. Levels outside 1..=5 read as missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyInput {
    pub user_id: Uuid,
    pub date: Date,
    pub sleep: Option<u8>,
    pub stress: Option<u8>,
    pub skincare_effort: Option<u8>,
    pub skin_condition: Option<u8>,
    pub region_code: String,
    /// Informational only, never used for scoring.
    pub menstruation_self_report: bool,
}

fn level(value: Option<i16>) -> Option<u8> {
    value
        .and_then(|v| u8::try_from(v).ok())
        .filter(|v| (1..=5).contains(v))
}

impl From<&DailyInputRow> for DailyInput {
    fn from(r: &DailyInputRow) -> Self {
        Self {
            user_id: r.user_id,
            date: r.date,
            sleep: level(r.sleep),
            stress: level(r.stress),
            skincare_effort: level(r.skincare_effort),
            skin_condition: level(r.skin_condition),
            region_code: r.region_code.clone(),
            menstruation_self_report: r.menstruation_self_report,
        }
    }
}
