//! Crossover search: the age at which WL's cash value overtakes the BTID fund

use crate::policy::{EconomicAssumptions, PolicyError, CEILING_AGE};

use super::engine::Projector;

/// Sentinel crossover age meaning "never within the projection ceiling":
/// BTID stays ahead indefinitely
pub const CROSSOVER_NEVER: u8 = CEILING_AGE;

/// Years after issue excluded from the scan. WL starts from zero, so the
/// first few rows always show a spurious BTID lead.
pub const CROSSOVER_GRACE_YEARS: u8 = 5;

impl Projector {
    /// First age at which the WL nominal cash value strictly exceeds the
    /// BTID nominal fund, scanning a zero-discount projection to the
    /// ceiling age. Returns [`CROSSOVER_NEVER`] when WL never catches up.
    pub fn crossover_age(&self, investment_return: f64) -> Result<u8, PolicyError> {
        let econ = EconomicAssumptions::nominal(investment_return)?;
        let params = self.params().with_death_age(CEILING_AGE);
        let table = Projector::new(params).project(econ);

        let start_check_age = self.params().current_age + CROSSOVER_GRACE_YEARS;
        Ok(table
            .iter()
            .filter(|row| row.age > start_check_age)
            .find(|row| row.wl_nominal > row.btid_nominal)
            .map(|row| row.age)
            .unwrap_or(CROSSOVER_NEVER))
    }

    /// Crossover age for each investment return in `returns`, preserving
    /// input order. Feeds the strategy-frontier sweep.
    pub fn crossover_frontier(&self, returns: &[f64]) -> Result<Vec<(f64, u8)>, PolicyError> {
        returns.iter().map(|&r| Ok((r, self.crossover_age(r)?))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyParameters;

    fn base_params() -> PolicyParameters {
        PolicyParameters::new(30, 85, 300_000.0, 6_000.0, 800.0, 0.0375, 20, 3.0, 70, 70)
            .expect("valid parameters")
    }

    #[test]
    fn test_low_return_crosses_before_ceiling() {
        // At zero investment return the participating WL fund must
        // eventually overtake a flat pile of savings.
        let age = Projector::new(base_params()).crossover_age(0.0).unwrap();
        assert!(age < CROSSOVER_NEVER, "expected a crossover, got sentinel");
        assert!(age > 30 + CROSSOVER_GRACE_YEARS);
    }

    #[test]
    fn test_high_return_never_crosses() {
        // Investment return well above the participating rate: BTID wins
        // indefinitely.
        let age = Projector::new(base_params()).crossover_age(0.05).unwrap();
        assert_eq!(age, CROSSOVER_NEVER);
    }

    #[test]
    fn test_crossover_monotone_in_return() {
        let projector = Projector::new(base_params());
        let returns: Vec<f64> = (0..=40).map(|i| i as f64 * 0.002).collect();

        let frontier = projector.crossover_frontier(&returns).unwrap();
        for pair in frontier.windows(2) {
            assert!(
                pair[1].1 >= pair[0].1,
                "crossover age decreased from {:?} to {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_grace_window_respected() {
        let projector = Projector::new(base_params());
        for r in [0.0, 0.01, 0.02, 0.03] {
            let age = projector.crossover_age(r).unwrap();
            assert!(age > 35, "crossover {age} inside the grace window at return {r}");
        }
    }

    #[test]
    fn test_search_ignores_policy_death_age() {
        // The search projects to the ceiling regardless of the profile's
        // shorter horizon, so a crossover beyond death_age is still found.
        let short = base_params().with_death_age(40);
        let long = base_params();
        assert_eq!(
            Projector::new(short).crossover_age(0.0).unwrap(),
            Projector::new(long).crossover_age(0.0).unwrap()
        );
    }

    #[test]
    fn test_non_finite_return_rejected() {
        let projector = Projector::new(base_params());
        assert!(matches!(
            projector.crossover_age(f64::NAN),
            Err(PolicyError::Rate { .. })
        ));
        assert!(matches!(
            projector.crossover_age(f64::INFINITY),
            Err(PolicyError::Rate { .. })
        ));
    }
}
