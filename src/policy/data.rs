//! Policy parameter structures for the term-vs-whole-life comparison

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard ceiling on any projected or simulated age. Crossover search always
/// runs to this age, and no simulated life outlives it.
pub const CEILING_AGE: u8 = 100;

/// Sex of the insured, used to select the actuarial table slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// String form matching the sex column of the table files
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

/// Rejection reasons for invalid policy parameters
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("current age {current_age} must be below projection age {death_age}")]
    AgeOrder { current_age: u8, death_age: u8 },

    #[error("projection age {0} exceeds the ceiling age {CEILING_AGE}")]
    BeyondCeiling(u8),

    #[error("payment term must be at least 1 year, got {0}")]
    PaymentTerm(u32),

    #[error("term expiry age {term_expiry_age} must be above current age {current_age}")]
    TermExpiry { term_expiry_age: u8, current_age: u8 },

    #[error("multiplier factor must be at least 1.0, got {0}")]
    Multiplier(f64),

    #[error("{field} must be finite and non-negative, got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be finite and greater than -1, got {value}")]
    Rate { field: &'static str, value: f64 },
}

/// Immutable per-run policy snapshot: one whole-life quote and one term quote
/// for the same sum assured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyParameters {
    /// Age at issue
    pub current_age: u8,

    /// Projection horizon (expected death age for deterministic runs)
    pub death_age: u8,

    /// Sum assured shared by both products
    pub sum_assured: f64,

    /// Annual whole-life premium, riders included
    pub wl_premium: f64,

    /// Annual term premium, riders included
    pub term_premium: f64,

    /// Fixed participating-fund return credited to the WL cash value after
    /// the build-up phase
    pub wl_participating_rate: f64,

    /// Number of years premiums are paid
    pub payment_term: u32,

    /// Death-benefit uplift on the WL policy before the drop-off age
    pub multiplier_factor: f64,

    /// Age at which the multiplier drops back to 1x
    pub multiplier_age: u8,

    /// Age at which term coverage (and its premiums) cease
    pub term_expiry_age: u8,
}

impl PolicyParameters {
    /// Validate and construct a parameter snapshot. Invalid combinations are
    /// rejected here so the projection loops never see them.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        current_age: u8,
        death_age: u8,
        sum_assured: f64,
        wl_premium: f64,
        term_premium: f64,
        wl_participating_rate: f64,
        payment_term: u32,
        multiplier_factor: f64,
        multiplier_age: u8,
        term_expiry_age: u8,
    ) -> Result<Self, PolicyError> {
        if current_age >= death_age {
            return Err(PolicyError::AgeOrder { current_age, death_age });
        }
        if death_age > CEILING_AGE {
            return Err(PolicyError::BeyondCeiling(death_age));
        }
        if payment_term < 1 {
            return Err(PolicyError::PaymentTerm(payment_term));
        }
        if term_expiry_age <= current_age {
            return Err(PolicyError::TermExpiry { term_expiry_age, current_age });
        }
        if !multiplier_factor.is_finite() || multiplier_factor < 1.0 {
            return Err(PolicyError::Multiplier(multiplier_factor));
        }
        for (field, value) in [
            ("sum_assured", sum_assured),
            ("wl_premium", wl_premium),
            ("term_premium", term_premium),
            ("wl_participating_rate", wl_participating_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PolicyError::OutOfRange { field, value });
            }
        }

        Ok(Self {
            current_age,
            death_age,
            sum_assured,
            wl_premium,
            term_premium,
            wl_participating_rate,
            payment_term,
            multiplier_factor,
            multiplier_age,
            term_expiry_age,
        })
    }

    /// Projection length in years
    pub fn duration(&self) -> u32 {
        (self.death_age - self.current_age) as u32
    }

    /// Same policy re-targeted to a different projection age. Used by the
    /// crossover search, which always projects to the ceiling.
    pub fn with_death_age(&self, death_age: u8) -> Self {
        Self { death_age, ..self.clone() }
    }

    /// Whether the term policy still covers at the given attained age
    pub fn term_in_force(&self, age: u8) -> bool {
        age < self.term_expiry_age
    }

    /// WL death-benefit multiplier at the given attained age
    pub fn multiplier_at(&self, age: u8) -> f64 {
        if age < self.multiplier_age {
            self.multiplier_factor
        } else {
            1.0
        }
    }

    /// WL death benefit: higher of the multiplied sum assured and the sum
    /// assured plus accumulated cash value
    pub fn wl_death_benefit(&self, age: u8, cash_value: f64) -> f64 {
        (self.sum_assured * self.multiplier_at(age)).max(self.sum_assured + cash_value)
    }
}

/// Market assumptions applied on top of a policy snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicAssumptions {
    /// Annual return on the invested premium difference
    pub investment_return: f64,

    /// Rate used for present-value conversion
    pub discount_rate: f64,
}

impl EconomicAssumptions {
    /// Validate and construct. Both rates must be finite and above -100%.
    pub fn new(investment_return: f64, discount_rate: f64) -> Result<Self, PolicyError> {
        check_rate("investment_return", investment_return)?;
        check_rate("discount_rate", discount_rate)?;
        Ok(Self { investment_return, discount_rate })
    }

    /// Nominal-only view: zero discounting, PV columns equal nominal columns
    pub fn nominal(investment_return: f64) -> Result<Self, PolicyError> {
        Self::new(investment_return, 0.0)
    }
}

fn check_rate(field: &'static str, value: f64) -> Result<(), PolicyError> {
    if !value.is_finite() || value <= -1.0 {
        return Err(PolicyError::Rate { field, value });
    }
    Ok(())
}
