use anyhow::Context;
use time::Date;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CloseCycleRequest, CreateCycleRequest, UpdateCycleRequest};
use super::error::CycleError;
use super::repo;
use super::repo_types::CycleInterval;
use super::store::CycleStore;
use super::validator;
use crate::error::ServiceError;
use crate::scoring::{RecalcSummary, ScoreEngine};
use crate::state::AppState;

pub const MAX_LIST_LIMIT: i64 = 50;

// Every mutation validates and writes inside one transaction; scores are
// re-derived after commit so a failed recalculation can be re-run.

/// `(start, end)` of an interval as it stood before or after a mutation.
pub type Shape = (Date, Option<Date>);

pub async fn recalculate_shapes(
    engine: &ScoreEngine,
    user_id: Uuid,
    today: Date,
    shapes: &[Shape],
) -> anyhow::Result<RecalcSummary> {
    let mut summary = RecalcSummary::default();
    for &(start, end) in shapes {
        summary += engine
            .recalculate_after_cycle_change(user_id, start, end, today)
            .await?;
    }
    Ok(summary)
}

async fn recalculate(
    state: &AppState,
    user_id: Uuid,
    shapes: &[Shape],
) -> Result<RecalcSummary, ServiceError> {
    Ok(recalculate_shapes(&state.score_engine(), user_id, state.today(), shapes).await?)
}

pub async fn apply_create(
    store: &mut dyn CycleStore,
    user_id: Uuid,
    start: Date,
    end: Option<Date>,
) -> Result<(CycleInterval, Vec<Shape>), ServiceError> {
    if !store.list_open(user_id).await?.is_empty() {
        return Err(CycleError::OpenIntervalExists.into());
    }
    let previous = store.previous_before(user_id, start, None).await?;
    let next = store.next_after(user_id, start, None).await?;
    validator::validate(start, end, previous.as_ref(), next.as_ref())?;

    let interval = store.insert(user_id, start, end).await?;
    let shapes = vec![(interval.start_date, interval.end_date)];
    Ok((interval, shapes))
}

pub async fn apply_close(
    store: &mut dyn CycleStore,
    user_id: Uuid,
    end: Date,
) -> Result<(CycleInterval, Vec<Shape>), ServiceError> {
    let open = validator::single_open(store.list_open(user_id).await?)?;
    let previous = store.previous_before(user_id, open.start_date, Some(open.id)).await?;
    let next = store.next_after(user_id, open.start_date, Some(open.id)).await?;
    validator::validate(open.start_date, Some(end), previous.as_ref(), next.as_ref())?;

    let closed = store.update(open.id, open.start_date, Some(end)).await?;
    let shapes = vec![(open.start_date, None), (closed.start_date, closed.end_date)];
    Ok((closed, shapes))
}

/// Absent fields keep their stored value; the edited interval is excluded
/// from its own neighbour lookups.
pub async fn apply_update(
    store: &mut dyn CycleStore,
    user_id: Uuid,
    id: Uuid,
    req: &UpdateCycleRequest,
) -> Result<(CycleInterval, Vec<Shape>), ServiceError> {
    let old = store
        .find(user_id, id)
        .await?
        .ok_or(CycleError::NotFound)?;
    let start = req.start_date.unwrap_or(old.start_date);
    let end = req.end_date.or(old.end_date);

    let previous = store.previous_before(user_id, start, Some(id)).await?;
    let next = store.next_after(user_id, start, Some(id)).await?;
    validator::validate(start, end, previous.as_ref(), next.as_ref())?;

    let updated = store.update(id, start, end).await?;
    let shapes = vec![
        (old.start_date, old.end_date),
        (updated.start_date, updated.end_date),
    ];
    Ok((updated, shapes))
}

pub async fn apply_delete(
    store: &mut dyn CycleStore,
    user_id: Uuid,
    id: Uuid,
) -> Result<Vec<Shape>, ServiceError> {
    let removed = store
        .find(user_id, id)
        .await?
        .ok_or(CycleError::NotFound)?;
    store.delete(user_id, id).await?;
    Ok(vec![(removed.start_date, removed.end_date)])
}

#[instrument(skip(state))]
pub async fn list(
    state: &AppState,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<CycleInterval>, ServiceError> {
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(ServiceError::bad_request(format!(
            "limit must be between 1 and {MAX_LIST_LIMIT}"
        )));
    }
    Ok(repo::list_recent(&state.db, user_id, limit).await?)
}

#[instrument(skip(state))]
pub async fn create(
    state: &AppState,
    user_id: Uuid,
    req: CreateCycleRequest,
) -> Result<(CycleInterval, RecalcSummary), ServiceError> {
    let mut tx = state.db.begin().await.context("begin cycle create")?;
    let (interval, shapes) = apply_create(&mut *tx, user_id, req.start_date, req.end_date).await?;
    tx.commit().await.context("commit cycle create")?;
    info!(id = %interval.id, start = %interval.start_date, "cycle interval created");

    let summary = recalculate(state, user_id, &shapes).await?;
    Ok((interval, summary))
}

#[instrument(skip(state))]
pub async fn close_current(
    state: &AppState,
    user_id: Uuid,
    req: CloseCycleRequest,
) -> Result<(CycleInterval, RecalcSummary), ServiceError> {
    let mut tx = state.db.begin().await.context("begin cycle close")?;
    let (closed, shapes) = apply_close(&mut *tx, user_id, req.end_date).await?;
    tx.commit().await.context("commit cycle close")?;
    info!(id = %closed.id, end = %req.end_date, "cycle interval closed");

    let summary = recalculate(state, user_id, &shapes).await?;
    Ok((closed, summary))
}

#[instrument(skip(state))]
pub async fn update(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    req: UpdateCycleRequest,
) -> Result<(CycleInterval, RecalcSummary), ServiceError> {
    if req.start_date.is_none() && req.end_date.is_none() {
        return Err(ServiceError::bad_request("nothing to update"));
    }

    let mut tx = state.db.begin().await.context("begin cycle update")?;
    let (updated, shapes) = apply_update(&mut *tx, user_id, id, &req).await?;
    tx.commit().await.context("commit cycle update")?;
    info!(%id, "cycle interval updated");

    let summary = recalculate(state, user_id, &shapes).await?;
    Ok((updated, summary))
}

#[instrument(skip(state))]
pub async fn delete(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
) -> Result<RecalcSummary, ServiceError> {
    let mut tx = state.db.begin().await.context("begin cycle delete")?;
    let shapes = apply_delete(&mut *tx, user_id, id).await?;
    tx.commit().await.context("commit cycle delete")?;
    info!(%id, "cycle interval deleted");

    recalculate(state, user_id, &shapes).await
}
