use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::Date;
use tracing::instrument;

use super::dto::{RadarQuery, SkinScoreResponse, TrendQuery};
use super::radar::RadarChart;
use super::services;
use super::trends::PersonalTrend;
use crate::{auth::AuthUser, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/skin-score/:date", get(get_skin_score))
        .route("/dashboard/radar-chart", get(get_radar_chart))
        .route("/dashboard/trends", get(get_trends))
}

#[instrument(skip(state))]
pub async fn get_skin_score(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<Date>,
) -> Result<Json<SkinScoreResponse>, (StatusCode, String)> {
    let score = services::skin_score(&state, user_id, date).await?;
    Ok(Json(score.into()))
}

#[instrument(skip(state))]
pub async fn get_radar_chart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RadarQuery>,
) -> Result<Json<RadarChart>, (StatusCode, String)> {
    let chart = services::radar_chart(&state, user_id, q.start_date, q.end_date).await?;
    Ok(Json(chart))
}

#[instrument(skip(state))]
pub async fn get_trends(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<TrendQuery>,
) -> Result<Json<PersonalTrend>, (StatusCode, String)> {
    Ok(Json(services::trends(&state, user_id, q.date).await?))
}
