//! Deterministic year-by-year projection of both strategies

mod crossover;
mod engine;
mod row;
mod state;

pub use crossover::{CROSSOVER_GRACE_YEARS, CROSSOVER_NEVER};
pub use engine::Projector;
pub use row::{ProjectionRow, ProjectionSummary, ProjectionTable};
pub use state::StrategyState;
