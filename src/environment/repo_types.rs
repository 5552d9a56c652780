use serde::Serialize;
use sqlx::FromRow;
use time::Date;

/// Weather for one (date, region); every measurement may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct EnvironmentSample {
    pub date: Date,
    pub region_code: String,
    pub avg_temp_c: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub uv_index: Option<f64>,
    pub weather_code: Option<String>,
}

/// A prefecture and the point its weather is sampled at.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Region {
    pub code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}
