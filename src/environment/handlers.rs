use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{RegionListResponse, WeatherQuery, WeatherResponse};
use super::services;
use crate::{auth::AuthUser, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/regions", get(list_regions))
        .route("/external/weather", get(get_weather))
}

#[instrument(skip(state))]
pub async fn list_regions(
    State(state): State<AppState>,
) -> Result<Json<RegionListResponse>, (StatusCode, String)> {
    Ok(Json(services::list_regions(&state).await?.into()))
}

#[instrument(skip(state))]
pub async fn get_weather(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<WeatherQuery>,
) -> Result<Json<WeatherResponse>, (StatusCode, String)> {
    let sample = services::weather_for(&state, user_id, q).await?;
    Ok(Json(sample.into()))
}
