use axum::http::StatusCode;
use time::Date;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleError {
    #[error("end_date must not be earlier than start_date")]
    InvalidRange,
    #[error("start_date must be after the previous interval's end ({previous_end})")]
    OverlapWithPrevious { previous_end: Date },
    #[error("end_date must be before the next interval's start ({next_start})")]
    OverlapWithNext { next_start: Date },
    #[error("the preceding interval starting {previous_start} is still open; repair it first")]
    UnresolvedPriorInterval { previous_start: Date },
    #[error("an open interval must be the latest; another interval starts {next_start}")]
    OpenIntervalMustBeLatest { next_start: Date },
    #[error("an interval is still open; close it before starting a new one")]
    OpenIntervalExists,
    #[error("no open interval to close")]
    NothingToClose,
    #[error("{count} open intervals found; cycle history is inconsistent")]
    MultipleOpenIntervals { count: usize },
    #[error("cycle interval not found")]
    NotFound,
}

impl CycleError {
    pub fn status(&self) -> StatusCode {
        match self {
            CycleError::UnresolvedPriorInterval { .. } | CycleError::MultipleOpenIntervals { .. } => {
                StatusCode::CONFLICT
            }
            CycleError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
