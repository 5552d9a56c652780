use serde::{Deserialize, Serialize};
use time::Date;

use super::repo_types::{EnvironmentSample, Region};

#[derive(Debug, Serialize)]
pub struct RegionListResponse {
    pub regions: Vec<Region>,
    pub total: usize,
}

impl From<Vec<Region>> for RegionListResponse {
    fn from(regions: Vec<Region>) -> Self {
        Self {
            total: regions.len(),
            regions,
        }
    }
}

/// `date` defaults to today, `region_code` to the caller's profile region.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub date: Option<Date>,
    pub region_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub date: Date,
    pub region_code: String,
    pub avg_temp_c: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub uv_index: Option<f64>,
    pub weather_code: Option<String>,
}

impl From<EnvironmentSample> for WeatherResponse {
    fn from(s: EnvironmentSample) -> Self {
        Self {
            date: s.date,
            region_code: s.region_code,
            avg_temp_c: s.avg_temp_c,
            avg_humidity: s.avg_humidity,
            uv_index: s.uv_index,
            weather_code: s.weather_code,
        }
    }
}
