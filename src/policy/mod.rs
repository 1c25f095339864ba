//! Policy inputs: the insured's profile and the two product quotes being compared

mod data;

pub use data::{EconomicAssumptions, PolicyError, PolicyParameters, Sex, CEILING_AGE};
