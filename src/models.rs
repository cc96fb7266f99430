//! Core data structures for ERF processing.
//!
//! Defines the dataset kinds, the labeled three-dimensional forcing
//! array, and processing statistics.

use ndarray::Array3;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The two persisted datasets produced by one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    /// Main forcing table (aggregated aerosol and HFC columns included)
    Main,
    /// Individually-tracked minor greenhouse gases
    MinorGhgs,
}

impl DatasetKind {
    /// Fixed output file name for this dataset kind
    pub fn output_file_name(&self) -> &'static str {
        match self {
            DatasetKind::Main => "ERF_data.parquet",
            DatasetKind::MinorGhgs => "ERF_minorGHGs_data.parquet",
        }
    }
}

/// Labeled three-dimensional forcing array.
///
/// Axes are (scenario, variable, year); each cell holds one effective
/// radiative forcing value in W/m². Coordinate labels travel with the
/// values so the array can be persisted and reconstructed without losing
/// axis meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErfDataArray {
    /// Scenario identifiers along axis 0, e.g. "ssp119"
    pub scenarios: Vec<String>,
    /// Forcing variable names along axis 1, e.g. "total_anthropogenic"
    pub variables: Vec<String>,
    /// Calendar years along axis 2, 1750 onward
    pub years: Vec<i64>,
    /// Forcing values, shape (scenarios, variables, years)
    pub values: Array3<f64>,
}

impl ErfDataArray {
    /// Array shape as (scenarios, variables, years)
    pub fn shape(&self) -> (usize, usize, usize) {
        let s = self.values.shape();
        (s[0], s[1], s[2])
    }

    /// Look up a single value by coordinate labels
    pub fn value(&self, scenario: &str, variable: &str, year: i64) -> Option<f64> {
        let s = self.scenarios.iter().position(|v| v == scenario)?;
        let v = self.variables.iter().position(|v| v == variable)?;
        let y = self.years.iter().position(|v| *v == year)?;
        Some(self.values[[s, v, y]])
    }
}

/// Statistics for one processing run
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub scenarios_processed: usize,
    pub main_variables: usize,
    pub minor_variables: usize,
    pub years_covered: usize,
    pub rows_written: usize,
    pub output_paths: Vec<PathBuf>,
    pub processing_time_ms: u128,
}
