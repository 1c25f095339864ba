//! Per-life outcome records and batch aggregation

use serde::{Deserialize, Serialize};

/// A paid event in a simulated life, or survival to the ceiling age.
/// CI and death tags are logged only when a payout actually occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeEvent {
    /// Critical illness claim paid
    Ci,
    /// Death claim paid
    Death,
    /// Reached the ceiling age; terminated there
    Survive,
}

/// Result of one simulated lifetime, immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeOutcome {
    /// Paid events in the order they occurred
    pub events: Vec<LifeEvent>,

    /// Age at which the life terminated
    pub final_age: u8,

    /// Present value of the BTID fund minus present value of WL cash
    /// received, at the life's end
    pub wealth_diff_pv: f64,
}

impl LifeOutcome {
    /// Number of CI claims actually paid
    pub fn ci_claims(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, LifeEvent::Ci)).count()
    }

    pub fn survived(&self) -> bool {
        self.events.last() == Some(&LifeEvent::Survive)
    }
}

/// Aggregate statistics over a batch of simulated lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub lives: usize,
    pub mean_wealth_diff: f64,
    pub median_wealth_diff: f64,
    /// Fraction of lives ending with a positive BTID-minus-WL differential
    pub btid_win_rate: f64,
    pub ci_claims: usize,
    pub death_claims: usize,
    pub survivors: usize,
    pub mean_final_age: f64,
}

/// Aggregate a batch of life outcomes. Empty input yields a zeroed summary.
pub fn summarize(outcomes: &[LifeOutcome]) -> BatchSummary {
    if outcomes.is_empty() {
        return BatchSummary {
            lives: 0,
            mean_wealth_diff: 0.0,
            median_wealth_diff: 0.0,
            btid_win_rate: 0.0,
            ci_claims: 0,
            death_claims: 0,
            survivors: 0,
            mean_final_age: 0.0,
        };
    }

    let n = outcomes.len();
    let mut diffs: Vec<f64> = outcomes.iter().map(|o| o.wealth_diff_pv).collect();
    diffs.sort_by(|a, b| a.total_cmp(b));

    let median = if n % 2 == 1 {
        diffs[n / 2]
    } else {
        (diffs[n / 2 - 1] + diffs[n / 2]) / 2.0
    };

    let ci_claims = outcomes.iter().map(|o| o.ci_claims()).sum();
    let death_claims = outcomes
        .iter()
        .flat_map(|o| &o.events)
        .filter(|e| matches!(e, LifeEvent::Death))
        .count();
    let survivors = outcomes.iter().filter(|o| o.survived()).count();

    BatchSummary {
        lives: n,
        mean_wealth_diff: diffs.iter().sum::<f64>() / n as f64,
        median_wealth_diff: median,
        btid_win_rate: outcomes.iter().filter(|o| o.wealth_diff_pv > 0.0).count() as f64
            / n as f64,
        ci_claims,
        death_claims,
        survivors,
        mean_final_age: outcomes.iter().map(|o| o.final_age as f64).sum::<f64>() / n as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(events: Vec<LifeEvent>, final_age: u8, diff: f64) -> LifeOutcome {
        LifeOutcome { events, final_age, wealth_diff_pv: diff }
    }

    #[test]
    fn test_ci_claim_count() {
        let o = outcome(vec![LifeEvent::Ci, LifeEvent::Ci, LifeEvent::Death], 62, -10.0);
        assert_eq!(o.ci_claims(), 2);
        assert!(!o.survived());
    }

    #[test]
    fn test_summarize_batch() {
        let outcomes = vec![
            outcome(vec![LifeEvent::Death], 60, -50_000.0),
            outcome(vec![LifeEvent::Ci, LifeEvent::Survive], 100, 20_000.0),
            outcome(vec![LifeEvent::Survive], 100, 80_000.0),
        ];

        let summary = summarize(&outcomes);
        assert_eq!(summary.lives, 3);
        assert_eq!(summary.ci_claims, 1);
        assert_eq!(summary.death_claims, 1);
        assert_eq!(summary.survivors, 2);
        assert_eq!(summary.median_wealth_diff, 20_000.0);
        assert!((summary.btid_win_rate - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_empty_batch() {
        let summary = summarize(&[]);
        assert_eq!(summary.lives, 0);
        assert_eq!(summary.btid_win_rate, 0.0);
    }
}
