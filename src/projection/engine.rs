//! Deterministic projector: perfect, full, riskless investing of the premium
//! difference against the whole-life contract's smoothed build-up
//!
//! Canonical recurrence choices (the source material carried divergent
//! variants; these are the ones this engine commits to):
//! - BTID fund compounds the prior balance first, then applies the year's
//!   cashflow: `fund = fund * (1 + r) + cashflow`, floored at zero.
//! - WL cash value ramps on build-up progress `(t - 2) / (payment_term - 2)`
//!   toward 85% of cumulative premiums.
//! - Coverage tests (term cover, multiplier drop-off) use the row's attained
//!   age, so row-level boundary properties hold exactly at the drop-off ages.

use crate::policy::{EconomicAssumptions, PolicyParameters};

use super::row::{ProjectionRow, ProjectionTable};
use super::state::StrategyState;

/// Deterministic cash-flow projector for one validated policy snapshot
#[derive(Debug, Clone)]
pub struct Projector {
    params: PolicyParameters,
}

impl Projector {
    pub fn new(params: PolicyParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PolicyParameters {
        &self.params
    }

    /// Project both strategies year by year from issue to the horizon.
    /// Deterministic, no side effects, O(duration).
    pub fn project(&self, econ: EconomicAssumptions) -> ProjectionTable {
        let params = &self.params;
        let duration = params.duration();
        let mut rows = Vec::with_capacity(duration as usize + 1);

        // Row 0: issue-date seed values
        rows.push(ProjectionRow {
            age: params.current_age,
            btid_nominal: 0.0,
            wl_nominal: 0.0,
            btid_death: params.sum_assured,
            wl_death: params.sum_assured * params.multiplier_factor,
            btid_pv: 0.0,
            wl_pv: 0.0,
        });

        let mut state = StrategyState::new();

        for t in 1..=duration {
            let age = (params.current_age as u32 + t) as u8;
            let term_in_force = params.term_in_force(age);

            let cashflow = StrategyState::btid_cashflow(params, t, term_in_force);
            state.credit_fund(cashflow, econ.investment_return);
            state.roll_wl_cash_value(t, params);

            let term_cover = if term_in_force { params.sum_assured } else { 0.0 };
            let discount = (1.0 + econ.discount_rate).powi(-(t as i32));

            rows.push(ProjectionRow {
                age,
                btid_nominal: state.fund,
                wl_nominal: state.wl_cash_value,
                btid_death: term_cover + state.fund,
                wl_death: params.wl_death_benefit(age, state.wl_cash_value),
                btid_pv: state.fund * discount,
                wl_pv: state.wl_cash_value * discount,
            });
        }

        ProjectionTable::new(rows)
    }
}
