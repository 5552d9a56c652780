use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use time::Date;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateRecordRequest, RecordListQuery, RecordResponse, UpdateRecordRequest};
use super::error::RecordError;
use super::repo;
use crate::environment::{repo as environment_repo, services::ensure_environment};
use crate::error::ServiceError;
use crate::scoring::repo as score_repo;
use crate::state::AppState;

pub const MAX_LIST_LIMIT: i64 = 100;
pub const MEMO_MAX_CHARS: usize = 255;

pub(crate) fn is_valid_region_code(code: &str) -> bool {
    lazy_static! {
        static ref REGION_RE: Regex = Regex::new(r"^[0-9]{2}$").unwrap();
    }
    REGION_RE.is_match(code)
}

fn check_level(field: &'static str, value: Option<i16>) -> Result<(), RecordError> {
    match value {
        Some(v) if !(1..=5).contains(&v) => Err(RecordError::ValueOutOfRange { field, value: v }),
        _ => Ok(()),
    }
}

fn check_memo(memo: Option<&str>) -> Result<(), RecordError> {
    match memo {
        Some(m) if m.chars().count() > MEMO_MAX_CHARS => Err(RecordError::MemoTooLong {
            max: MEMO_MAX_CHARS,
        }),
        _ => Ok(()),
    }
}

pub(crate) fn ensure_not_future(
    date: Date,
    today: Date,
    field: &'static str,
) -> Result<(), RecordError> {
    if date > today {
        return Err(RecordError::FutureDate { field });
    }
    Ok(())
}

fn validate_create(req: &CreateRecordRequest, today: Date) -> Result<(), RecordError> {
    ensure_not_future(req.date, today, "date")?;
    check_level("skin_condition", Some(req.skin_condition))?;
    check_level("sleep", Some(req.sleep))?;
    check_level("stress", Some(req.stress))?;
    check_level("skincare_effort", Some(req.skincare_effort))?;
    check_memo(req.memo.as_deref())?;
    if !is_valid_region_code(&req.region_code) {
        return Err(RecordError::InvalidRegion(req.region_code.clone()));
    }
    Ok(())
}

fn validate_update(req: &UpdateRecordRequest) -> Result<(), RecordError> {
    if req.is_empty() {
        return Err(RecordError::EmptyUpdate);
    }
    check_level("skin_condition", req.skin_condition)?;
    check_level("sleep", req.sleep)?;
    check_level("stress", req.stress)?;
    check_level("skincare_effort", req.skincare_effort)?;
    check_memo(req.memo.as_deref())?;
    if let Some(code) = &req.region_code {
        if !is_valid_region_code(code) {
            return Err(RecordError::InvalidRegion(code.clone()));
        }
    }
    Ok(())
}

async fn ensure_region_exists(state: &AppState, code: &str) -> Result<(), ServiceError> {
    if environment_repo::find_region(&state.db, code).await?.is_none() {
        return Err(RecordError::InvalidRegion(code.to_string()).into());
    }
    Ok(())
}

#[instrument(skip(state, req), fields(date = %req.date))]
pub async fn create(
    state: &AppState,
    user_id: Uuid,
    req: CreateRecordRequest,
) -> Result<RecordResponse, ServiceError> {
    validate_create(&req, state.today())?;
    ensure_region_exists(state, &req.region_code).await?;
    if repo::find_by_date(&state.db, user_id, req.date).await?.is_some() {
        return Err(RecordError::AlreadyExists.into());
    }

    ensure_environment(state, req.date, &req.region_code).await;

    let row = repo::insert(&state.db, user_id, &req)
        .await?
        .ok_or(RecordError::AlreadyExists)?;
    info!(record_id = %row.id, "daily record created");

    let score = state.score_engine().score_day(user_id, row.date).await?;
    let mut response = RecordResponse::from(row);
    response.composite_score = score.map(|(s, _)| s.composite_score);
    Ok(response)
}

#[instrument(skip(state))]
pub async fn get(state: &AppState, user_id: Uuid, date: Date) -> Result<RecordResponse, ServiceError> {
    ensure_not_future(date, state.today(), "date")?;
    let row = repo::find_by_date(&state.db, user_id, date)
        .await?
        .ok_or(RecordError::NotFound)?;
    Ok(row.into())
}

#[instrument(skip(state))]
pub async fn list(
    state: &AppState,
    user_id: Uuid,
    q: RecordListQuery,
) -> Result<Vec<RecordResponse>, ServiceError> {
    let today = state.today();
    if let Some(start) = q.start_date {
        ensure_not_future(start, today, "start_date")?;
    }
    if let Some(end) = q.end_date {
        ensure_not_future(end, today, "end_date")?;
    }
    if let (Some(start), Some(end)) = (q.start_date, q.end_date) {
        if start > end {
            return Err(ServiceError::bad_request("start_date must not be after end_date"));
        }
    }
    if !(1..=MAX_LIST_LIMIT).contains(&q.limit) {
        return Err(ServiceError::bad_request(format!(
            "limit must be between 1 and {MAX_LIST_LIMIT}"
        )));
    }

    let rows = repo::list(&state.db, user_id, q.start_date, q.end_date, q.limit).await?;
    Ok(rows.into_iter().map(RecordResponse::from).collect())
}

#[instrument(skip(state, req))]
pub async fn update(
    state: &AppState,
    user_id: Uuid,
    date: Date,
    req: UpdateRecordRequest,
) -> Result<RecordResponse, ServiceError> {
    validate_update(&req)?;
    if let Some(code) = &req.region_code {
        ensure_region_exists(state, code).await?;
    }

    let existing = repo::find_by_date(&state.db, user_id, date)
        .await?
        .ok_or(RecordError::NotFound)?;
    let region = req.region_code.as_deref().unwrap_or(&existing.region_code);
    ensure_environment(state, date, region).await;

    let row = repo::update(&state.db, user_id, date, &req)
        .await?
        .ok_or(RecordError::NotFound)?;
    info!(record_id = %row.id, "daily record updated");

    let score = state.score_engine().score_day(user_id, date).await?;
    let mut response = RecordResponse::from(row);
    response.composite_score = score.map(|(s, _)| s.composite_score);
    Ok(response)
}

/// Removes the input and its score together, then drops cached views
/// covering the date.
#[instrument(skip(state))]
pub async fn delete(state: &AppState, user_id: Uuid, date: Date) -> Result<(), ServiceError> {
    let mut tx = state.db.begin().await.context("begin record delete")?;
    if !repo::delete(&mut *tx, user_id, date).await? {
        return Err(RecordError::NotFound.into());
    }
    score_repo::delete(&mut *tx, user_id, date).await?;
    tx.commit().await.context("commit record delete")?;
    info!("daily record deleted");

    state.invalidator().invalidate_date(user_id, date).await;
    Ok(())
}
