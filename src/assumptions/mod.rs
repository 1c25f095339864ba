//! Actuarial assumptions: mortality and critical-illness incidence tables

pub mod loader;
mod tables;

pub use loader::TableError;
pub use tables::{ActuarialTables, CI_INCIDENCE_LOADING, FALLBACK_RATE};

use crate::policy::Sex;
use std::path::Path;

/// Cumulative critical-illness risk between two ages, as a percentage, read
/// from CSV tables under `dir`. Degrades to 0.0 when the tables are
/// missing or unparseable so presentation layers stay usable.
pub fn cumulative_risk_from(dir: &Path, sex: Sex, current_age: u8, target_age: u8) -> f64 {
    match ActuarialTables::from_csv(dir, sex) {
        Ok(tables) => tables.cumulative_risk(current_age, target_age),
        Err(err) => {
            log::warn!("CI tables unavailable ({err}); reporting 0% cumulative risk");
            0.0
        }
    }
}
