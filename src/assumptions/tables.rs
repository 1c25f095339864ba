//! Per-age mortality and critical-illness incidence lookups
//!
//! A table instance is scoped to one sex and one valuation year, loaded once
//! and read-only afterwards. Missing ages resolve to a documented fallback
//! probability rather than raising, so lookups never fail mid-simulation.

use std::collections::HashMap;
use std::path::Path;

use crate::policy::Sex;

use super::loader::{self, TableError};

/// Probability returned when an age is absent from a table
pub const FALLBACK_RATE: f64 = 0.05;

/// Fixed loading applied to raw CI incidence rates
pub const CI_INCIDENCE_LOADING: f64 = 1.3;

/// First age carried by the built-in illustrative tables
const ILLUSTRATIVE_BASE_AGE: u8 = 20;

/// Read-only hazard lookups for one sex and valuation year
#[derive(Debug, Clone)]
pub struct ActuarialTables {
    /// Annual mortality probability qx by attained age
    mortality: HashMap<u8, f64>,

    /// Annual CI incidence probability by attained age, loading applied
    ci_incidence: HashMap<u8, f64>,

    sex: Sex,
    year: u32,
}

impl ActuarialTables {
    /// Build from a mortality qx mapping and a raw per-mille CI incidence
    /// mapping. The per-mille rates are scaled to probabilities and the
    /// incidence loading is applied here, once.
    pub fn new(
        sex: Sex,
        year: u32,
        mortality: HashMap<u8, f64>,
        ci_per_mille: HashMap<u8, f64>,
    ) -> Self {
        let ci_incidence = ci_per_mille
            .into_iter()
            .map(|(age, per_mille)| (age, (per_mille / 1000.0 * CI_INCIDENCE_LOADING).min(1.0)))
            .collect();
        Self { mortality, ci_incidence, sex, year }
    }

    /// Load both tables from CSV files in `dir`, filtered to `sex` and the
    /// latest year present in the mortality file
    pub fn from_csv(dir: &Path, sex: Sex) -> Result<Self, TableError> {
        let (year, mortality) = loader::load_mortality(dir, sex)?;
        let ci_per_mille = loader::load_ci_incidence(dir, sex)?;
        Ok(Self::new(sex, year, mortality, ci_per_mille))
    }

    /// Built-in illustrative tables for runs without data files. Mortality
    /// follows an industry basic table; CI incidence is graded between
    /// per-mille pivot points. Illustrative loadings, not filed rates.
    pub fn illustrative(sex: Sex) -> Self {
        let mortality = ILLUSTRATIVE_QX
            .iter()
            .enumerate()
            .map(|(i, &(female, male))| {
                let age = ILLUSTRATIVE_BASE_AGE + i as u8;
                let qx = match sex {
                    Sex::Female => female,
                    Sex::Male => male,
                };
                (age, qx)
            })
            .collect();

        let mut ci_per_mille = HashMap::new();
        for age in ILLUSTRATIVE_BASE_AGE..=crate::policy::CEILING_AGE {
            ci_per_mille.insert(age, graded_ci_per_mille(age, sex));
        }

        Self::new(sex, 2024, mortality, ci_per_mille)
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    /// Annual mortality probability at `age`, falling back to
    /// [`FALLBACK_RATE`] for ages outside the table
    pub fn mortality_rate(&self, age: u8) -> f64 {
        self.mortality.get(&age).copied().unwrap_or(FALLBACK_RATE)
    }

    /// Loaded annual CI incidence probability at `age`, same fallback
    pub fn ci_incidence_rate(&self, age: u8) -> f64 {
        self.ci_incidence.get(&age).copied().unwrap_or(FALLBACK_RATE)
    }

    /// Probability (as a percentage) of at least one CI event between
    /// `current_age` and `target_age`, composing per-year survival
    /// probabilities multiplicatively
    pub fn cumulative_risk(&self, current_age: u8, target_age: u8) -> f64 {
        let mut survival = 1.0;
        for age in current_age..target_age {
            let q_ci = self.ci_incidence_rate(age).clamp(0.0, 1.0);
            survival *= 1.0 - q_ci;
        }
        (1.0 - survival) * 100.0
    }
}

/// Linear grade of CI incidence (per mille) between pivot ages
fn graded_ci_per_mille(age: u8, sex: Sex) -> f64 {
    let pivots: &[(u8, f64)] = match sex {
        // Female incidence peaks earlier (breast/gynae cancers dominate mid-life)
        Sex::Female => &[
            (20, 0.25),
            (30, 0.60),
            (40, 1.80),
            (50, 4.50),
            (60, 9.00),
            (70, 16.00),
            (80, 26.00),
            (90, 38.00),
            (100, 50.00),
        ],
        Sex::Male => &[
            (20, 0.20),
            (30, 0.45),
            (40, 1.30),
            (50, 4.00),
            (60, 10.50),
            (70, 21.00),
            (80, 34.00),
            (90, 48.00),
            (100, 62.00),
        ],
    };

    let (first_age, first_rate) = pivots[0];
    if age <= first_age {
        return first_rate;
    }
    for window in pivots.windows(2) {
        let (lo_age, lo_rate) = window[0];
        let (hi_age, hi_rate) = window[1];
        if age <= hi_age {
            let span = (hi_age - lo_age) as f64;
            let progress = (age - lo_age) as f64 / span;
            return lo_rate + (hi_rate - lo_rate) * progress;
        }
    }
    pivots[pivots.len() - 1].1
}

/// Illustrative annual qx (female, male), ages 20..=100, IAM 2012 basic
const ILLUSTRATIVE_QX: [(f64, f64); 81] = [
    // Age 20-29
    (0.000253, 0.000459),
    (0.00026, 0.000492),
    (0.000266, 0.000526),
    (0.000272, 0.000569),
    (0.000275, 0.000616),
    (0.000277, 0.000669),
    (0.000284, 0.000728),
    (0.00029, 0.000764),
    (0.0003, 0.000789),
    (0.000313, 0.000808),
    // Age 30-39
    (0.000333, 0.000824),
    (0.000357, 0.000834),
    (0.000375, 0.000838),
    (0.00039, 0.000828),
    (0.000405, 0.000808),
    (0.000424, 0.000789),
    (0.000447, 0.000783),
    (0.000476, 0.0008),
    (0.000514, 0.000837),
    (0.00056, 0.000889),
    // Age 40-49
    (0.000613, 0.000955),
    (0.000667, 0.001029),
    (0.000723, 0.00111),
    (0.000774, 0.001188),
    (0.000823, 0.001268),
    (0.000866, 0.001355),
    (0.000917, 0.001464),
    (0.000983, 0.001615),
    (0.001072, 0.001808),
    (0.001168, 0.002032),
    // Age 50-59
    (0.00129, 0.002285),
    (0.001453, 0.002557),
    (0.001622, 0.002828),
    (0.001792, 0.003088),
    (0.001972, 0.003345),
    (0.002166, 0.003616),
    (0.002393, 0.003922),
    (0.002666, 0.004272),
    (0.003, 0.004681),
    (0.003393, 0.005146),
    // Age 60-69
    (0.003844, 0.005662),
    (0.004352, 0.006237),
    (0.004899, 0.006854),
    (0.005482, 0.00751),
    (0.006118, 0.00822),
    (0.006829, 0.009007),
    (0.007279, 0.009497),
    (0.007821, 0.010085),
    (0.008475, 0.010787),
    (0.009234, 0.011625),
    // Age 70-79
    (0.010083, 0.012619),
    (0.011011, 0.013798),
    (0.01203, 0.015195),
    (0.013154, 0.016834),
    (0.014415, 0.018733),
    (0.015869, 0.020905),
    (0.017555, 0.023367),
    (0.0195, 0.026155),
    (0.021758, 0.029306),
    (0.024412, 0.032858),
    // Age 80-89
    (0.027579, 0.036927),
    (0.031501, 0.041703),
    (0.036122, 0.046957),
    (0.041477, 0.052713),
    (0.047589, 0.059148),
    (0.054441, 0.066505),
    (0.061972, 0.075015),
    (0.070155, 0.084823),
    (0.078963, 0.095987),
    (0.088336, 0.108482),
    // Age 90-99
    (0.098197, 0.122214),
    (0.108323, 0.136799),
    (0.119188, 0.152409),
    (0.131334, 0.169078),
    (0.145521, 0.186882),
    (0.162722, 0.205844),
    (0.18212, 0.219247),
    (0.199661, 0.238612),
    (0.217946, 0.258341),
    (0.236834, 0.278219),
    // Age 100
    (0.256357, 0.298452),
];
