//! Per-life state machine with mortality and CI hazards
//!
//! Each trial is an independent lifetime: one uniform draw per year decides
//! death, a CI event, or neither. Mortality is loaded by a health multiplier
//! that grows with the number of CI events already experienced; CI incidence
//! itself is taken from the table without state loading. Trials run in
//! parallel, each on its own seeded sub-stream, so batches are reproducible
//! regardless of thread scheduling.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::ActuarialTables;
use crate::policy::{EconomicAssumptions, PolicyError, PolicyParameters, CEILING_AGE};
use crate::projection::StrategyState;

use super::outcome::{LifeEvent, LifeOutcome};

/// Cap on the loaded per-year mortality probability
const MAX_LOADED_MORTALITY: f64 = 0.99;

/// Mortality loading by count of prior CI events
fn health_multiplier(ci_events: u32) -> f64 {
    match ci_events {
        0 => 1.0,
        1 => 2.5,
        _ => 5.0,
    }
}

/// Batch configuration for one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Number of independent lifetimes to simulate
    pub n_lives: usize,

    /// Annual return on the BTID fund and on WL payouts once received
    pub investment_return: f64,

    /// Rate for present-value conversion of the final differential
    pub discount_rate: f64,

    /// Whether the WL policy allows more than one CI claim
    pub multi_pay_enabled: bool,

    /// WL claim cap when multi-pay is enabled
    pub max_claims: u32,
}

impl SimulationRequest {
    /// Validate and construct. Rate checks match [`EconomicAssumptions`]:
    /// finite and above -100%.
    pub fn new(
        n_lives: usize,
        investment_return: f64,
        discount_rate: f64,
        multi_pay_enabled: bool,
        max_claims: u32,
    ) -> Result<Self, PolicyError> {
        EconomicAssumptions::new(investment_return, discount_rate)?;
        Ok(Self { n_lives, investment_return, discount_rate, multi_pay_enabled, max_claims })
    }

    /// WL claims allowed per life
    fn wl_claim_limit(&self) -> u32 {
        if self.multi_pay_enabled {
            self.max_claims
        } else {
            1
        }
    }
}

/// Monte Carlo simulator over one read-only table handle
pub struct StochasticSimulator {
    tables: ActuarialTables,
    seed: u64,
}

impl StochasticSimulator {
    pub fn new(tables: ActuarialTables, seed: u64) -> Self {
        Self { tables, seed }
    }

    pub fn tables(&self) -> &ActuarialTables {
        &self.tables
    }

    /// Run `n_lives` independent trials. Output order matches trial index.
    pub fn simulate(
        &self,
        params: &PolicyParameters,
        request: &SimulationRequest,
    ) -> Vec<LifeOutcome> {
        self.simulate_with_progress(params, request, &AtomicUsize::new(0))
    }

    /// Same as [`simulate`](Self::simulate), incrementing `progress` once
    /// per completed trial so a host can poll batch progress.
    pub fn simulate_with_progress(
        &self,
        params: &PolicyParameters,
        request: &SimulationRequest,
        progress: &AtomicUsize,
    ) -> Vec<LifeOutcome> {
        (0..request.n_lives)
            .into_par_iter()
            .map(|trial| {
                // One deterministic sub-stream per trial index; never a
                // shared draw-order-dependent generator across threads.
                let mut rng = ChaCha20Rng::seed_from_u64(self.seed.wrapping_add(trial as u64));
                let outcome = self.run_life(params, request, &mut rng);
                progress.fetch_add(1, Ordering::Relaxed);
                outcome
            })
            .collect()
    }

    /// WL claim amount: the first claim pays the full death benefit (higher
    /// of multiplied SA and SA + cash value); later multi-pay claims pay the
    /// multiplied SA only.
    fn wl_claim_amount(
        &self,
        params: &PolicyParameters,
        age: u8,
        prior_claims: u32,
        cash_value: f64,
    ) -> f64 {
        if prior_claims == 0 {
            params.wl_death_benefit(age, cash_value)
        } else {
            params.sum_assured * params.multiplier_at(age)
        }
    }

    /// One full lifetime, from issue age to termination
    fn run_life(
        &self,
        params: &PolicyParameters,
        request: &SimulationRequest,
        rng: &mut ChaCha20Rng,
    ) -> LifeOutcome {
        let r = request.investment_return;
        let wl_limit = request.wl_claim_limit();

        let mut state = StrategyState::new();
        let mut wl_received = 0.0;
        let mut wl_active = true;
        let mut wl_claims = 0u32;
        let mut term_claimed = false;
        let mut ci_events = 0u32;
        let mut events = Vec::new();
        let mut final_age = CEILING_AGE;

        for age in params.current_age..=CEILING_AGE {
            let t = (age - params.current_age) as u32 + 1;
            let mut wl_payout = 0.0;
            let mut term_payout = 0.0;

            if age == CEILING_AGE {
                // Forced termination at the ceiling, no draw. Coverage that
                // is still active pays out; the life is tagged as surviving
                // the horizon.
                if wl_active && wl_claims < wl_limit {
                    wl_payout += self.wl_claim_amount(params, age, wl_claims, state.wl_cash_value);
                }
                if !term_claimed && params.term_in_force(age) {
                    term_payout += params.sum_assured;
                }
                wl_received += wl_payout;
                state.deposit(term_payout);
                events.push(LifeEvent::Survive);
                final_age = age;
                break;
            }

            let q_d = (self.tables.mortality_rate(age) * health_multiplier(ci_events))
                .min(MAX_LOADED_MORTALITY);
            let q_ci = self.tables.ci_incidence_rate(age);
            let u: f64 = rng.random();

            if u < q_d {
                // Death: whichever coverage is still active pays, then the
                // life terminates. Tagged only if something paid.
                let mut paid = false;
                if wl_active && wl_claims < wl_limit {
                    wl_payout += self.wl_claim_amount(params, age, wl_claims, state.wl_cash_value);
                    paid = true;
                }
                if !term_claimed && params.term_in_force(age) {
                    term_payout += params.sum_assured;
                    paid = true;
                }
                wl_received += wl_payout;
                state.deposit(term_payout);
                if paid {
                    events.push(LifeEvent::Death);
                }
                final_age = age;
                break;
            }

            if u < q_d + q_ci {
                // CI event. The health state worsens whether or not any
                // policy still pays.
                ci_events += 1;
                let mut paid = false;
                if wl_active && wl_claims < wl_limit {
                    wl_payout += self.wl_claim_amount(params, age, wl_claims, state.wl_cash_value);
                    wl_claims += 1;
                    if !request.multi_pay_enabled || wl_claims >= wl_limit {
                        wl_active = false;
                    }
                    paid = true;
                }
                if !term_claimed && params.term_in_force(age) {
                    // Term is one-shot: the CI acceleration consumes it.
                    term_payout += params.sum_assured;
                    term_claimed = true;
                    paid = true;
                }
                if paid {
                    events.push(LifeEvent::Ci);
                }
            }

            // End-of-year cash handling: claim proceeds land before the
            // year's compounding, the premium cashflow after it. Premiums
            // follow the deterministic schedule, which gates the term
            // premium on the attained age at the end of the year.
            let term_premium_due = !term_claimed && params.term_in_force(age + 1);
            state.deposit(term_payout);
            state.credit_fund(StrategyState::btid_cashflow(params, t, term_premium_due), r);
            state.roll_wl_cash_value(t, params);
            wl_received = (wl_received + wl_payout) * (1.0 + r);
        }

        let years = (final_age - params.current_age) as i32;
        let discount = (1.0 + request.discount_rate).powi(-years);

        LifeOutcome {
            events,
            final_age,
            wealth_diff_pv: (state.fund - wl_received) * discount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{EconomicAssumptions, Sex};
    use crate::projection::Projector;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn base_params() -> PolicyParameters {
        PolicyParameters::new(30, 85, 300_000.0, 6_000.0, 800.0, 0.0375, 20, 3.0, 70, 70)
            .expect("valid parameters")
    }

    fn request(n_lives: usize, multi_pay: bool, max_claims: u32) -> SimulationRequest {
        SimulationRequest::new(n_lives, 0.05, 0.03, multi_pay, max_claims)
            .expect("valid request")
    }

    fn simulator() -> StochasticSimulator {
        StochasticSimulator::new(ActuarialTables::illustrative(Sex::Male), 42)
    }

    /// Tables with no hazards at all: every life survives to the ceiling
    fn zero_hazard_tables() -> ActuarialTables {
        let zeros: HashMap<u8, f64> = (0..=CEILING_AGE).map(|age| (age, 0.0)).collect();
        ActuarialTables::new(Sex::Male, 2024, zeros.clone(), zeros)
    }

    #[test]
    fn test_final_ages_within_bounds() {
        let outcomes = simulator().simulate(&base_params(), &request(500, false, 1));
        assert_eq!(outcomes.len(), 500);
        for o in &outcomes {
            assert!(o.final_age >= 30 && o.final_age <= CEILING_AGE);
            if o.survived() {
                assert_eq!(o.final_age, CEILING_AGE);
            }
        }
    }

    #[test]
    fn test_single_pay_allows_at_most_one_ci_claim() {
        let outcomes = simulator().simulate(&base_params(), &request(1_000, false, 5));
        assert!(outcomes.iter().any(|o| o.ci_claims() == 1), "expected some CI claims");
        for o in &outcomes {
            assert!(o.ci_claims() <= 1, "single-pay life with {} CI claims", o.ci_claims());
        }
    }

    #[test]
    fn test_multi_pay_respects_claim_cap() {
        let max_claims = 3;
        let outcomes = simulator().simulate(&base_params(), &request(1_000, true, max_claims));
        for o in &outcomes {
            assert!(
                o.ci_claims() <= max_claims as usize,
                "multi-pay life exceeded cap: {} claims",
                o.ci_claims()
            );
        }
    }

    #[test]
    fn test_same_seed_reproduces_batch() {
        let params = base_params();
        let req = request(200, true, 2);
        let a = simulator().simulate(&params, &req);
        let b = simulator().simulate(&params, &req);
        assert_eq!(a, b, "same seed must reproduce the batch exactly");
    }

    #[test]
    fn test_different_seeds_diverge() {
        let params = base_params();
        let req = request(200, false, 1);
        let tables = ActuarialTables::illustrative(Sex::Male);
        let a = StochasticSimulator::new(tables.clone(), 1).simulate(&params, &req);
        let b = StochasticSimulator::new(tables, 2).simulate(&params, &req);
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_hazards_reproduce_deterministic_projection() {
        // No deaths, no CI: every life survives to 100 and the fund follows
        // the deterministic recurrence exactly. The WL endowment at the
        // ceiling pays SA + cash value.
        let params = base_params();
        let req = request(4, false, 1);
        let sim = StochasticSimulator::new(zero_hazard_tables(), 7);
        let outcomes = sim.simulate(&params, &req);

        let ceiling = Projector::new(params.with_death_age(CEILING_AGE))
            .project(EconomicAssumptions::nominal(req.investment_return).unwrap());
        let last = ceiling.rows.last().unwrap();
        let expected_diff = (last.btid_nominal - (300_000.0 + last.wl_nominal))
            * 1.03_f64.powi(-70);

        for o in &outcomes {
            assert_eq!(o.events, vec![LifeEvent::Survive]);
            assert_eq!(o.final_age, CEILING_AGE);
            assert_relative_eq!(o.wealth_diff_pv, expected_diff, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_ceiling_settlement_pays_active_coverages() {
        // Coverage still in force at the forced age-100 termination pays
        // out: the term SA lands in the fund with no further growth, and the
        // WL pot receives the full death benefit (the 5x multiplier binds
        // here). Pinned against the deterministic fund and cash value.
        let params =
            PolicyParameters::new(30, 85, 300_000.0, 6_000.0, 800.0, 0.0375, 20, 5.0, 120, 120)
                .expect("valid parameters");
        let req = request(3, false, 1);
        let sim = StochasticSimulator::new(zero_hazard_tables(), 11);
        let outcomes = sim.simulate(&params, &req);

        let ceiling = Projector::new(params.with_death_age(CEILING_AGE))
            .project(EconomicAssumptions::nominal(req.investment_return).unwrap());
        let last = ceiling.rows.last().unwrap();
        let expected_diff =
            (last.btid_nominal + 300_000.0 - 5.0 * 300_000.0) * 1.03_f64.powi(-70);

        for o in &outcomes {
            assert_eq!(o.events, vec![LifeEvent::Survive]);
            assert_relative_eq!(o.wealth_diff_pv, expected_diff, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_request_rejects_bad_rates() {
        assert!(SimulationRequest::new(100, f64::NAN, 0.03, false, 1).is_err());
        assert!(SimulationRequest::new(100, 0.05, -1.0, false, 1).is_err());
        assert!(SimulationRequest::new(100, 0.05, 0.03, false, 1).is_ok());
    }

    #[test]
    fn test_progress_counter_reaches_n_lives() {
        let progress = AtomicUsize::new(0);
        let outcomes =
            simulator().simulate_with_progress(&base_params(), &request(250, false, 1), &progress);
        assert_eq!(outcomes.len(), 250);
        assert_eq!(progress.load(Ordering::Relaxed), 250);
    }

    #[test]
    fn test_missing_tables_yield_empty_result() {
        let outcomes = crate::stochastic::simulate_lives(
            std::path::Path::new("/nonexistent/tables"),
            Sex::Male,
            &base_params(),
            &request(100, false, 1),
            42,
        );
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_event_tags_only_with_payout() {
        // After term expiry and WL exhaustion nothing can pay, so any tags
        // present must sit within the coverage limits.
        let outcomes = simulator().simulate(&base_params(), &request(1_000, false, 1));
        for o in &outcomes {
            let paid_events =
                o.events.iter().filter(|e| !matches!(e, LifeEvent::Survive)).count();
            // One WL claim + one term claim at most, and they can coincide
            // in a single tag, so at most two paid tags per life.
            assert!(paid_events <= 2, "unexpected tag count: {:?}", o.events);
        }
    }
}
