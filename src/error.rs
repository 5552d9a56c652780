use axum::http::StatusCode;
use tracing::error;

use crate::cycles::error::CycleError;
use crate::records::error::RecordError;

/// Failure of a service call, convertible into the handlers' error tuple.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Cycle(#[from] CycleError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Cycle(e) => e.status(),
            ServiceError::Record(e) => e.status(),
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for (StatusCode, String) {
    fn from(e: ServiceError) -> Self {
        let status = e.status();
        if status.is_server_error() {
            error!(error = ?e, "request failed");
        }
        (status, e.to_string())
    }
}
