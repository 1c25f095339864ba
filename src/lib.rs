//! BTID Engine - Decision support for "buy term, invest the difference"
//! versus participating whole-life cover
//!
//! This library provides:
//! - Deterministic year-by-year projection of both strategies
//! - Crossover search for the age at which WL overtakes the invested fund
//! - Monte Carlo lifetime simulation with mortality and CI hazards
//! - Actuarial table loading (CSV) with illustrative built-in fallbacks

pub mod assumptions;
pub mod policy;
pub mod projection;
pub mod stochastic;

// Re-export commonly used types
pub use assumptions::ActuarialTables;
pub use policy::{EconomicAssumptions, PolicyParameters, Sex};
pub use projection::{ProjectionRow, ProjectionTable, Projector};
pub use stochastic::{BatchSummary, LifeOutcome, SimulationRequest, StochasticSimulator};
