//! Year-by-year recurrence state shared by the deterministic projector and
//! the per-life stochastic loop

use crate::policy::PolicyParameters;

/// Fraction of paid premiums the WL cash value ramps toward during the
/// build-up phase
const WL_BUILDUP_TARGET: f64 = 0.85;

/// Running balances for one projected lifetime
#[derive(Debug, Clone, Default)]
pub struct StrategyState {
    /// BTID-side investment fund balance
    pub fund: f64,

    /// WL surrender value at the end of the latest completed year
    pub wl_cash_value: f64,

    /// Premiums paid into the WL policy so far
    wl_premiums_paid: f64,
}

impl StrategyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Net annual cashflow into the BTID fund for policy year `t`
    /// (1-indexed). During the payment term the full premium difference is
    /// saved each year regardless of term status; `term_premium_due` gates
    /// only the post-payment-term drawdown.
    pub fn btid_cashflow(params: &PolicyParameters, t: u32, term_premium_due: bool) -> f64 {
        if t <= params.payment_term {
            params.wl_premium - params.term_premium
        } else if term_premium_due {
            -params.term_premium
        } else {
            0.0
        }
    }

    /// Advance the BTID fund one year: compound the prior balance, then
    /// apply the net cashflow. Floored at zero; borrowing is out of scope.
    pub fn credit_fund(&mut self, cashflow: f64, investment_return: f64) {
        self.fund = (self.fund * (1.0 + investment_return) + cashflow).max(0.0);
    }

    /// Claim proceeds landing in the fund before this year's compounding
    pub fn deposit(&mut self, amount: f64) {
        self.fund += amount;
    }

    /// Advance the WL surrender value for policy year `t` (1-indexed):
    /// zero for the first two years, then a linear ramp toward 85% of
    /// cumulative premiums until the payment term ends, then compounding at
    /// the participating rate.
    pub fn roll_wl_cash_value(&mut self, t: u32, params: &PolicyParameters) {
        if t <= params.payment_term {
            self.wl_premiums_paid += params.wl_premium;
        }

        self.wl_cash_value = if t <= 2 {
            0.0
        } else if t <= params.payment_term {
            // Guarded denominator: payment_term <= 2 never reaches this arm,
            // but a defined ramp keeps the degenerate case division-free.
            let ramp_years = params.payment_term.saturating_sub(2).max(1) as f64;
            let progress = (t - 2) as f64 / ramp_years;
            self.wl_premiums_paid * WL_BUILDUP_TARGET * progress
        } else {
            self.wl_cash_value * (1.0 + params.wl_participating_rate)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> PolicyParameters {
        PolicyParameters::new(30, 85, 300_000.0, 6_000.0, 800.0, 0.0375, 20, 3.0, 70, 70)
            .expect("valid parameters")
    }

    #[test]
    fn test_cashflow_phases() {
        let p = params();
        assert_eq!(StrategyState::btid_cashflow(&p, 1, true), 5_200.0);
        assert_eq!(StrategyState::btid_cashflow(&p, 20, true), 5_200.0);
        assert_eq!(StrategyState::btid_cashflow(&p, 21, true), -800.0);
        assert_eq!(StrategyState::btid_cashflow(&p, 45, false), 0.0);
    }

    #[test]
    fn test_payment_term_saving_is_unconditional() {
        // The premium-difference saving runs for the whole payment term even
        // once the term policy has lapsed or been claimed.
        let p = params();
        assert_eq!(StrategyState::btid_cashflow(&p, 10, false), 5_200.0);
        assert_eq!(StrategyState::btid_cashflow(&p, 20, false), 5_200.0);
    }

    #[test]
    fn test_fund_compounds_before_cashflow() {
        let p = params();
        let mut state = StrategyState::new();
        state.credit_fund(StrategyState::btid_cashflow(&p, 1, true), 0.05);
        // Year 1 contribution is not compounded in the year it lands
        assert_relative_eq!(state.fund, 5_200.0);

        state.credit_fund(StrategyState::btid_cashflow(&p, 2, true), 0.05);
        assert_relative_eq!(state.fund, 5_200.0 * 1.05 + 5_200.0);
    }

    #[test]
    fn test_fund_floored_at_zero() {
        let mut state = StrategyState::new();
        state.credit_fund(-800.0, 0.05);
        assert_eq!(state.fund, 0.0);
    }

    #[test]
    fn test_wl_two_year_zero_window() {
        let p = params();
        let mut state = StrategyState::new();
        state.roll_wl_cash_value(1, &p);
        assert_eq!(state.wl_cash_value, 0.0);
        state.roll_wl_cash_value(2, &p);
        assert_eq!(state.wl_cash_value, 0.0);
        state.roll_wl_cash_value(3, &p);
        assert!(state.wl_cash_value > 0.0);
    }

    #[test]
    fn test_wl_ramp_reaches_target_at_payment_term() {
        let p = params();
        let mut state = StrategyState::new();
        for t in 1..=20 {
            state.roll_wl_cash_value(t, &p);
        }
        // Full ramp: 85% of 20 years of premiums
        assert_relative_eq!(state.wl_cash_value, 20.0 * 6_000.0 * 0.85);

        state.roll_wl_cash_value(21, &p);
        assert_relative_eq!(state.wl_cash_value, 20.0 * 6_000.0 * 0.85 * 1.0375);
    }

    #[test]
    fn test_degenerate_payment_term_keeps_value_at_zero() {
        let p = PolicyParameters::new(30, 85, 300_000.0, 6_000.0, 800.0, 0.0375, 2, 1.0, 70, 70)
            .expect("valid parameters");
        let mut state = StrategyState::new();
        for t in 1..=30 {
            state.roll_wl_cash_value(t, &p);
        }
        assert_eq!(state.wl_cash_value, 0.0);
    }
}
