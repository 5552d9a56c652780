mod dto;
pub mod error;
pub mod handlers;
pub mod repo;
pub mod repo_types;
mod services;
pub mod store;
pub mod validator;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
