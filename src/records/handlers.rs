use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::Date;
use tracing::instrument;

use super::dto::{
    CreateRecordRequest, RecordListQuery, RecordListResponse, RecordResponse, UpdateRecordRequest,
};
use super::services;
use crate::{auth::AuthUser, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/records", get(list_records).post(create_record))
        .route(
            "/records/:date",
            get(get_record).patch(update_record).delete(delete_record),
        )
}

#[instrument(skip(state))]
pub async fn list_records(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RecordListQuery>,
) -> Result<Json<RecordListResponse>, (StatusCode, String)> {
    let records = services::list(&state, user_id, q).await?;
    Ok(Json(RecordListResponse {
        total: records.len(),
        records,
    }))
}

#[instrument(skip(state, body))]
pub async fn create_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<RecordResponse>), (StatusCode, String)> {
    let record = services::create(&state, user_id, body).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state))]
pub async fn get_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<Date>,
) -> Result<Json<RecordResponse>, (StatusCode, String)> {
    Ok(Json(services::get(&state, user_id, date).await?))
}

#[instrument(skip(state, body))]
pub async fn update_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<Date>,
    Json(body): Json<UpdateRecordRequest>,
) -> Result<Json<RecordResponse>, (StatusCode, String)> {
    Ok(Json(services::update(&state, user_id, date, body).await?))
}

#[instrument(skip(state))]
pub async fn delete_record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<Date>,
) -> Result<StatusCode, (StatusCode, String)> {
    services::delete(&state, user_id, date).await?;
    Ok(StatusCode::NO_CONTENT)
}
