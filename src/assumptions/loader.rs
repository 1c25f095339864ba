//! CSV-based table loader
//!
//! Reads the two tabular inputs: a mortality table keyed by (year, age, sex)
//! and a CI incidence table keyed by (age, sex) with per-mille rates. The
//! mortality file is filtered to the latest year it carries. Column names
//! are the external contract with the data files.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::policy::Sex;

/// Default directory for table files
pub const DEFAULT_TABLES_PATH: &str = "data/tables";

/// Mortality table file name
pub const MORTALITY_FILE: &str = "mortality.csv";

/// CI incidence table file name
pub const CI_INCIDENCE_FILE: &str = "ci_incidence.csv";

/// Failures while acquiring table data
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table row: {0}")]
    Csv(#[from] csv::Error),

    #[error("no {table} rows for sex {sex}")]
    NoRows { table: &'static str, sex: &'static str },
}

#[derive(Debug, serde::Deserialize)]
struct MortalityRow {
    #[serde(rename = "year")]
    year: u32,
    #[serde(rename = "age")]
    age: u8,
    #[serde(rename = "sex")]
    sex: String,
    #[serde(rename = "qx")]
    qx: f64,
}

#[derive(Debug, serde::Deserialize)]
struct CiRow {
    #[serde(rename = "age")]
    age: u8,
    #[serde(rename = "sex")]
    sex: String,
    #[serde(rename = "rate_per_mille")]
    rate_per_mille: f64,
}

/// Load mortality qx for one sex, filtered to the latest year in the file.
/// Returns the selected year alongside the age mapping.
pub fn load_mortality(dir: &Path, sex: Sex) -> Result<(u32, HashMap<u8, f64>), TableError> {
    let path = dir.join(MORTALITY_FILE);
    let file = File::open(&path).map_err(|source| TableError::Open { path, source })?;
    load_mortality_from_reader(file, sex)
}

/// Mortality loader over any reader (string buffers in tests)
pub fn load_mortality_from_reader<R: Read>(
    reader: R,
    sex: Sex,
) -> Result<(u32, HashMap<u8, f64>), TableError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut rows: Vec<MortalityRow> = Vec::new();
    for result in csv_reader.deserialize() {
        let row: MortalityRow = result?;
        if row.sex == sex.as_str() {
            rows.push(row);
        }
    }

    let latest_year = rows
        .iter()
        .map(|r| r.year)
        .max()
        .ok_or(TableError::NoRows { table: "mortality", sex: sex.as_str() })?;

    let mapping = rows
        .into_iter()
        .filter(|r| r.year == latest_year)
        .map(|r| (r.age, r.qx))
        .collect();

    Ok((latest_year, mapping))
}

/// Load raw per-mille CI incidence rates for one sex. Scaling and loading
/// are applied by the table constructor, not here.
pub fn load_ci_incidence(dir: &Path, sex: Sex) -> Result<HashMap<u8, f64>, TableError> {
    let path = dir.join(CI_INCIDENCE_FILE);
    let file = File::open(&path).map_err(|source| TableError::Open { path, source })?;
    load_ci_incidence_from_reader(file, sex)
}

/// CI incidence loader over any reader
pub fn load_ci_incidence_from_reader<R: Read>(
    reader: R,
    sex: Sex,
) -> Result<HashMap<u8, f64>, TableError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut mapping = HashMap::new();
    for result in csv_reader.deserialize() {
        let row: CiRow = result?;
        if row.sex == sex.as_str() {
            mapping.insert(row.age, row.rate_per_mille);
        }
    }

    if mapping.is_empty() {
        return Err(TableError::NoRows { table: "ci_incidence", sex: sex.as_str() });
    }

    Ok(mapping)
}
