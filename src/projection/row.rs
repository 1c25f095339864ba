//! Projection output structures

use serde::{Deserialize, Serialize};

/// One projected year: nominal and present-value wealth plus death benefits
/// for both strategies. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRow {
    /// Attained age at the end of the year
    pub age: u8,

    /// BTID fund balance, nominal
    pub btid_nominal: f64,

    /// WL surrender value, nominal
    pub wl_nominal: f64,

    /// BTID total death benefit (term cover + fund)
    pub btid_death: f64,

    /// WL total death benefit (higher of multiplied SA and SA + cash value)
    pub wl_death: f64,

    /// Present value of the BTID fund
    pub btid_pv: f64,

    /// Present value of the WL surrender value
    pub wl_pv: f64,
}

/// Ordered projection output, one row per age from issue to the horizon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionTable {
    pub rows: Vec<ProjectionRow>,
}

impl ProjectionTable {
    pub fn new(rows: Vec<ProjectionRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectionRow> {
        self.rows.iter()
    }

    /// Row for a specific attained age, if within the projection
    pub fn row_at_age(&self, age: u8) -> Option<&ProjectionRow> {
        self.rows.iter().find(|r| r.age == age)
    }

    /// Horizon figures for report footers
    pub fn summary(&self) -> ProjectionSummary {
        let last = self.rows.last();
        ProjectionSummary {
            years: self.rows.len().saturating_sub(1) as u32,
            final_btid_nominal: last.map(|r| r.btid_nominal).unwrap_or(0.0),
            final_wl_nominal: last.map(|r| r.wl_nominal).unwrap_or(0.0),
            final_btid_pv: last.map(|r| r.btid_pv).unwrap_or(0.0),
            final_wl_pv: last.map(|r| r.wl_pv).unwrap_or(0.0),
            peak_btid_death: self.rows.iter().map(|r| r.btid_death).fold(0.0, f64::max),
            peak_wl_death: self.rows.iter().map(|r| r.wl_death).fold(0.0, f64::max),
        }
    }
}

impl<'a> IntoIterator for &'a ProjectionTable {
    type Item = &'a ProjectionRow;
    type IntoIter = std::slice::Iter<'a, ProjectionRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub final_btid_nominal: f64,
    pub final_wl_nominal: f64,
    pub final_btid_pv: f64,
    pub final_wl_pv: f64,
    pub peak_btid_death: f64,
    pub peak_wl_death: f64,
}
