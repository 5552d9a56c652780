mod dto;
pub mod handlers;
pub mod radar;
mod services;
pub mod trends;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
