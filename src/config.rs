use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Tunables of the scoring engine. The trend thresholds are heuristics
/// without a derivation, so they stay configurable.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub recalc_days_before: i64,
    pub recalc_days_after_open: i64,
    pub recalc_days_after_closed: i64,
    pub recalc_min_buffer_days: i64,
    pub recalc_chunk_size: usize,
    pub default_menstruation_days: i64,
    pub radar_cache_ttl_secs: u64,
    pub problem_skin_threshold: u8,
    pub trend_min_sample_days: usize,
    pub trend_min_problem_days: usize,
    pub trend_driver_gap: f64,
    pub utc_offset_hours: i8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            recalc_days_before: 60,
            recalc_days_after_open: 60,
            recalc_days_after_closed: 10,
            recalc_min_buffer_days: 3,
            recalc_chunk_size: 7,
            default_menstruation_days: 5,
            radar_cache_ttl_secs: 60 * 60 * 12,
            problem_skin_threshold: 2,
            trend_min_sample_days: 14,
            trend_min_problem_days: 4,
            trend_driver_gap: 1.0,
            utc_offset_hours: 9,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub redis_url: Option<String>,
    pub weather: WeatherConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "hada".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "hada-users".into()),
        };
        let weather = WeatherConfig {
            api_key: non_empty("WEATHER_API_KEY"),
            base_url: std::env::var("WEATHER_API_BASE_URL")
                .unwrap_or_else(|_| "http://api.weatherapi.com/v1".into()),
            timeout_secs: env_or("WEATHER_TIMEOUT_SECS", 10),
        };

        let d = ScoringConfig::default();
        let scoring = ScoringConfig {
            recalc_days_before: env_or("RECALC_DAYS_BEFORE", d.recalc_days_before),
            recalc_days_after_open: env_or("RECALC_DAYS_AFTER_OPEN", d.recalc_days_after_open),
            recalc_days_after_closed: env_or(
                "RECALC_DAYS_AFTER_CLOSED",
                d.recalc_days_after_closed,
            ),
            recalc_min_buffer_days: env_or("RECALC_MIN_BUFFER_DAYS", d.recalc_min_buffer_days),
            recalc_chunk_size: env_or("RECALC_CHUNK_SIZE", d.recalc_chunk_size).max(1),
            default_menstruation_days: env_or(
                "DEFAULT_MENSTRUATION_DAYS",
                d.default_menstruation_days,
            ),
            radar_cache_ttl_secs: env_or("RADAR_CACHE_TTL_SECS", d.radar_cache_ttl_secs),
            problem_skin_threshold: env_or("PROBLEM_SKIN_THRESHOLD", d.problem_skin_threshold),
            trend_min_sample_days: env_or("TREND_MIN_SAMPLE_DAYS", d.trend_min_sample_days),
            trend_min_problem_days: env_or("TREND_MIN_PROBLEM_DAYS", d.trend_min_problem_days),
            trend_driver_gap: env_or("TREND_DRIVER_GAP", d.trend_driver_gap),
            utc_offset_hours: env_or("APP_UTC_OFFSET_HOURS", d.utc_offset_hours),
        };

        Ok(Self {
            database_url,
            jwt,
            redis_url: non_empty("REDIS_URL"),
            weather,
            scoring,
        })
    }
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
