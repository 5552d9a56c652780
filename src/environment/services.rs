use time::Date;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::dto::WeatherQuery;
use super::repo;
use super::repo_types::{EnvironmentSample, Region};
use crate::error::ServiceError;
use crate::profile::repo as profile_repo;
use crate::profile::repo_types::CycleProfile;
use crate::records::services::is_valid_region_code;
use crate::state::AppState;

/// Returns the stored sample for `(date, region)`, fetching and storing it
/// first when missing. Every failure is logged and yields `None`; callers
/// continue without weather data.
#[instrument(skip(state))]
pub async fn ensure_environment(
    state: &AppState,
    date: Date,
    region_code: &str,
) -> Option<EnvironmentSample> {
    match try_ensure(state, date, region_code).await {
        Ok(sample) => sample,
        Err(e) => {
            warn!(error = %e, %date, region_code, "environment sample unavailable");
            None
        }
    }
}

async fn try_ensure(
    state: &AppState,
    date: Date,
    region_code: &str,
) -> anyhow::Result<Option<EnvironmentSample>> {
    if let Some(existing) = repo::find(&state.db, date, region_code).await? {
        return Ok(Some(existing));
    }

    let Some(region) = repo::find_region(&state.db, region_code).await? else {
        warn!(region_code, "unknown region; skipping weather fetch");
        return Ok(None);
    };

    let reading = state
        .weather
        .fetch_daily(date, region.latitude, region.longitude)
        .await?;
    let sample = EnvironmentSample {
        date,
        region_code: region.code,
        avg_temp_c: reading.avg_temp_c,
        avg_humidity: reading.avg_humidity,
        uv_index: reading.uv_index,
        weather_code: reading.weather_code,
    };
    let stored = repo::insert_if_absent(&state.db, &sample).await?;
    debug!(%date, region_code, "environment sample stored");
    Ok(Some(stored))
}

#[instrument(skip(state))]
pub async fn list_regions(state: &AppState) -> Result<Vec<Region>, ServiceError> {
    Ok(repo::list_regions(&state.db).await?)
}

/// Region to read weather for: the explicit code, else the profile's.
fn resolve_region(
    requested: Option<String>,
    profile: Option<&CycleProfile>,
) -> Result<String, ServiceError> {
    let code = match requested {
        Some(code) => code,
        None => profile
            .and_then(|p| p.region_code.clone())
            .ok_or_else(|| ServiceError::bad_request("region_code not given and no profile region set"))?,
    };
    if !is_valid_region_code(&code) {
        return Err(ServiceError::bad_request(format!("invalid region code: {code}")));
    }
    Ok(code)
}

/// Stored or freshly fetched weather for the caller's day and region.
#[instrument(skip(state))]
pub async fn weather_for(
    state: &AppState,
    user_id: Uuid,
    query: WeatherQuery,
) -> Result<EnvironmentSample, ServiceError> {
    let date = query.date.unwrap_or_else(|| state.today());
    let region_code = match query.region_code {
        Some(code) => resolve_region(Some(code), None)?,
        None => {
            let profile = profile_repo::find(&state.db, user_id).await?;
            resolve_region(None, profile.as_ref())?
        }
    };
    if repo::find_region(&state.db, &region_code).await?.is_none() {
        return Err(ServiceError::NotFound("region"));
    }

    ensure_environment(state, date, &region_code)
        .await
        .ok_or(ServiceError::NotFound("weather data"))
}
