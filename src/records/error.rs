use axum::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("{field} must not be in the future")]
    FutureDate { field: &'static str },
    #[error("a record already exists for this date")]
    AlreadyExists,
    #[error("record not found")]
    NotFound,
    #[error("no fields to update")]
    EmptyUpdate,
    #[error("unknown region code: {0}")]
    InvalidRegion(String),
    #[error("{field} must be between 1 and 5, got {value}")]
    ValueOutOfRange { field: &'static str, value: i16 },
    #[error("memo must be at most {max} characters")]
    MemoTooLong { max: usize },
}

impl RecordError {
    pub fn status(&self) -> StatusCode {
        match self {
            RecordError::AlreadyExists => StatusCode::CONFLICT,
            RecordError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
