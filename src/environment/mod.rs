mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod weather;

use crate::state::AppState;
use axum::Router;

pub use weather::{DisabledWeather, WeatherApiClient, WeatherClient};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
