use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::UpdateProfileRequest;
use super::repo;
use super::repo_types::CycleProfile;
use crate::environment::repo as environment_repo;
use crate::error::ServiceError;
use crate::records::services::{ensure_not_future, is_valid_region_code};
use crate::state::AppState;

pub const CYCLE_LENGTH_RANGE: std::ops::RangeInclusive<i32> = 20..=40;

fn validate(req: &UpdateProfileRequest) -> Result<(), ServiceError> {
    if req.cycle_length_days.is_none()
        && req.last_menstruation_start.is_none()
        && req.region_code.is_none()
    {
        return Err(ServiceError::bad_request("no fields to update"));
    }
    if let Some(len) = req.cycle_length_days {
        if !CYCLE_LENGTH_RANGE.contains(&len) {
            return Err(ServiceError::bad_request(format!(
                "cycle_length_days must be between {} and {}",
                CYCLE_LENGTH_RANGE.start(),
                CYCLE_LENGTH_RANGE.end()
            )));
        }
    }
    if let Some(code) = &req.region_code {
        if !is_valid_region_code(code) {
            return Err(ServiceError::bad_request(format!("invalid region code: {code}")));
        }
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn get(state: &AppState, user_id: Uuid) -> Result<CycleProfile, ServiceError> {
    repo::find(&state.db, user_id)
        .await?
        .ok_or(ServiceError::NotFound("profile"))
}

/// Profile edits only affect future scoring; stored scores are left as is.
#[instrument(skip(state))]
pub async fn update(
    state: &AppState,
    user_id: Uuid,
    req: UpdateProfileRequest,
) -> Result<CycleProfile, ServiceError> {
    validate(&req)?;
    if let Some(start) = req.last_menstruation_start {
        ensure_not_future(start, state.today(), "last_menstruation_start")?;
    }
    if let Some(code) = &req.region_code {
        if environment_repo::find_region(&state.db, code).await?.is_none() {
            return Err(ServiceError::bad_request(format!("unknown region code: {code}")));
        }
    }

    let profile = repo::upsert(
        &state.db,
        user_id,
        req.cycle_length_days,
        req.last_menstruation_start,
        req.region_code.as_deref(),
    )
    .await?;
    info!("profile updated");
    Ok(profile)
}
