pub mod climate;
pub mod composite;
pub mod engine;
#[cfg(test)]
pub mod memory;
pub mod phase;
pub mod range;
pub mod repo;
pub mod store;
pub mod types;

pub use engine::{RecalcSummary, ScoreEngine};
