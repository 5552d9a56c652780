use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{
    CloseCycleRequest, CreateCycleRequest, CycleListQuery, CycleMutationResponse, CycleResponse,
    UpdateCycleRequest,
};
use super::services;
use crate::{auth::AuthUser, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cycles", get(list_cycles).post(create_cycle))
        .route("/cycles/end", patch(close_cycle))
        .route("/cycles/:id", patch(update_cycle).delete(delete_cycle))
}

#[instrument(skip(state))]
pub async fn list_cycles(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<CycleListQuery>,
) -> Result<Json<Vec<CycleResponse>>, (StatusCode, String)> {
    let cycles = services::list(&state, user_id, q.limit).await?;
    Ok(Json(cycles.into_iter().map(CycleResponse::from).collect()))
}

#[instrument(skip(state, body))]
pub async fn create_cycle(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateCycleRequest>,
) -> Result<(StatusCode, Json<CycleMutationResponse>), (StatusCode, String)> {
    let (interval, recalculation) = services::create(&state, user_id, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(CycleMutationResponse {
            interval: interval.into(),
            recalculation,
        }),
    ))
}

#[instrument(skip(state, body))]
pub async fn close_cycle(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CloseCycleRequest>,
) -> Result<Json<CycleMutationResponse>, (StatusCode, String)> {
    let (interval, recalculation) = services::close_current(&state, user_id, body).await?;
    Ok(Json(CycleMutationResponse {
        interval: interval.into(),
        recalculation,
    }))
}

#[instrument(skip(state, body))]
pub async fn update_cycle(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCycleRequest>,
) -> Result<Json<CycleMutationResponse>, (StatusCode, String)> {
    let (interval, recalculation) = services::update(&state, user_id, id, body).await?;
    Ok(Json(CycleMutationResponse {
        interval: interval.into(),
        recalculation,
    }))
}

#[instrument(skip(state))]
pub async fn delete_cycle(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    services::delete(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
