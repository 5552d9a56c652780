use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use time::macros::format_description;
use time::Date;
use tracing::debug;

use crate::config::WeatherConfig;

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather api key is not configured")]
    Disabled,
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("weather response has no forecast day")]
    EmptyForecast,
    #[error("date formatting: {0}")]
    Format(#[from] time::error::Format),
}

/// Daily aggregate reported by the provider. Any measurement may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentReading {
    pub avg_temp_c: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub uv_index: Option<f64>,
    pub weather_code: Option<String>,
}

#[async_trait]
pub trait WeatherClient: Send + Sync {
    async fn fetch_daily(
        &self,
        date: Date,
        latitude: f64,
        longitude: f64,
    ) -> Result<EnvironmentReading, WeatherError>;
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    forecast: Forecast,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    #[serde(default)]
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    day: DaySummary,
}

#[derive(Debug, Deserialize)]
struct DaySummary {
    avgtemp_c: Option<f64>,
    avghumidity: Option<f64>,
    uv: Option<f64>,
    condition: Option<Condition>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    code: Option<i64>,
}

impl HistoryResponse {
    fn into_reading(self) -> Result<EnvironmentReading, WeatherError> {
        let day = self
            .forecast
            .forecastday
            .into_iter()
            .next()
            .ok_or(WeatherError::EmptyForecast)?
            .day;
        Ok(EnvironmentReading {
            avg_temp_c: day.avgtemp_c,
            avg_humidity: day.avghumidity,
            uv_index: day.uv,
            weather_code: day.condition.and_then(|c| c.code).map(|c| c.to_string()),
        })
    }
}

/// WeatherAPI.com `history.json` client.
#[derive(Clone)]
pub struct WeatherApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    pub fn new(config: &WeatherConfig, api_key: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    async fn fetch_daily(
        &self,
        date: Date,
        latitude: f64,
        longitude: f64,
    ) -> Result<EnvironmentReading, WeatherError> {
        let dt = date.format(format_description!("[year]-[month]-[day]"))?;
        let query = format!("{latitude},{longitude}");
        let body: HistoryResponse = self
            .http
            .get(format!("{}/history.json", self.base_url))
            .query(&[("key", self.api_key.as_str()), ("q", query.as_str()), ("dt", dt.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(%date, %query, "weather history fetched");
        body.into_reading()
    }
}

/// Used when no API key is configured.
#[derive(Debug, Clone, Default)]
pub struct DisabledWeather;

#[async_trait]
impl WeatherClient for DisabledWeather {
    async fn fetch_daily(&self, _date: Date, _lat: f64, _lon: f64) -> Result<EnvironmentReading, WeatherError> {
        Err(WeatherError::Disabled)
    }
}
