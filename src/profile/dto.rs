use serde::{Deserialize, Serialize};
use time::Date;

use super::repo_types::CycleProfile;

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub cycle_length_days: Option<i32>,
    pub last_menstruation_start: Option<Date>,
    pub region_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub cycle_length_days: Option<i32>,
    pub last_menstruation_start: Option<Date>,
    pub region_code: Option<String>,
}

impl From<CycleProfile> for ProfileResponse {
    fn from(p: CycleProfile) -> Self {
        Self {
            cycle_length_days: p.cycle_length_days,
            last_menstruation_start: p.last_menstruation_start,
            region_code: p.region_code,
        }
    }
}
