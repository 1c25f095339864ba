//! Monte Carlo life-event simulation with state-dependent hazard loading

mod outcome;
mod simulator;

pub use outcome::{summarize, BatchSummary, LifeEvent, LifeOutcome};
pub use simulator::{SimulationRequest, StochasticSimulator};

use std::path::Path;

use crate::assumptions::ActuarialTables;
use crate::policy::{PolicyParameters, Sex};

/// Load tables for `sex` from `data_dir` and run the simulation. Returns an
/// empty collection when the tables are missing or unparseable; callers must
/// treat an empty result as "simulation unavailable".
pub fn simulate_lives(
    data_dir: &Path,
    sex: Sex,
    params: &PolicyParameters,
    request: &SimulationRequest,
    seed: u64,
) -> Vec<LifeOutcome> {
    match ActuarialTables::from_csv(data_dir, sex) {
        Ok(tables) => StochasticSimulator::new(tables, seed).simulate(params, request),
        Err(err) => {
            log::warn!("actuarial tables unavailable ({err}); returning empty simulation");
            Vec::new()
        }
    }
}
