//! Reshaping scenario tables into the stacked forcing array
//!
//! Each per-scenario table becomes a (variable x year) slab; the ordered
//! slabs are then stacked along a new scenario axis. Stacking requires
//! identical variable lists and year ranges across scenarios - any
//! mismatch is a merge failure.

use crate::constants::YEAR_COLUMN;
use crate::error::{ErfError, Result};
use crate::models::ErfDataArray;

use ndarray::{Array2, Array3};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// One scenario's forcing values as a labeled 2-D slab
#[derive(Debug, Clone)]
pub struct ScenarioSlab {
    pub variables: Vec<String>,
    pub years: Vec<i64>,
    /// Shape (variables, years); nulls from the source become NaN
    pub values: Array2<f64>,
}

/// Convert one scenario table into a slab, enforcing a unique and
/// strictly increasing year index
pub fn table_to_slab(scenario: &str, table: &DataFrame) -> Result<ScenarioSlab> {
    let year_column = table
        .column(YEAR_COLUMN)
        .map_err(|_| ErfError::MissingYearColumn {
            scenario: scenario.to_string(),
            column: YEAR_COLUMN.to_string(),
        })?;

    let years: Vec<i64> = year_column
        .i64()?
        .into_iter()
        .collect::<Option<Vec<i64>>>()
        .ok_or_else(|| ErfError::NonMonotonicYears {
            scenario: scenario.to_string(),
            details: "year index contains a null".to_string(),
        })?;

    for pair in years.windows(2) {
        if pair[1] <= pair[0] {
            return Err(ErfError::NonMonotonicYears {
                scenario: scenario.to_string(),
                details: format!("{} follows {}", pair[1], pair[0]),
            });
        }
    }

    let variables: Vec<String> = table
        .get_columns()
        .iter()
        .map(|c| c.name().to_string())
        .filter(|name| name != YEAR_COLUMN)
        .collect();

    let mut values = Array2::from_elem((variables.len(), years.len()), f64::NAN);
    for (vi, name) in variables.iter().enumerate() {
        let column = table.column(name.as_str())?.f64()?;
        for (yi, value) in column.into_iter().enumerate() {
            if let Some(v) = value {
                values[[vi, yi]] = v;
            }
        }
    }

    debug!(
        "Slab for scenario '{}': {} variables x {} years",
        scenario,
        variables.len(),
        years.len()
    );

    Ok(ScenarioSlab {
        variables,
        years,
        values,
    })
}

/// Stack the ordered slabs along a new scenario axis
pub fn stack_scenarios(slabs: &BTreeMap<String, ScenarioSlab>) -> Result<ErfDataArray> {
    let (first_name, reference) = slabs.iter().next().ok_or(ErfError::EmptyStack)?;

    for (scenario, slab) in slabs.iter() {
        if slab.variables != reference.variables {
            return Err(ErfError::MergeMismatch {
                scenario: scenario.clone(),
                details: format!(
                    "variable set differs from '{}' ({} vs {} variables)",
                    first_name,
                    slab.variables.len(),
                    reference.variables.len()
                ),
            });
        }
        if slab.years != reference.years {
            return Err(ErfError::MergeMismatch {
                scenario: scenario.clone(),
                details: format!(
                    "year range differs from '{}' ({} vs {} years)",
                    first_name,
                    slab.years.len(),
                    reference.years.len()
                ),
            });
        }
    }

    let scenarios: Vec<String> = slabs.keys().cloned().collect();
    let mut values = Array3::from_elem(
        (scenarios.len(), reference.variables.len(), reference.years.len()),
        f64::NAN,
    );
    for (si, slab) in slabs.values().enumerate() {
        values
            .index_axis_mut(ndarray::Axis(0), si)
            .assign(&slab.values);
    }

    Ok(ErfDataArray {
        scenarios,
        variables: reference.variables.clone(),
        years: reference.years.clone(),
        values,
    })
}

/// Reshape a whole scenario collection into one stacked array
pub fn collection_to_array(tables: &BTreeMap<String, DataFrame>) -> Result<ErfDataArray> {
    let mut slabs = BTreeMap::new();
    for (scenario, table) in tables {
        slabs.insert(scenario.clone(), table_to_slab(scenario, table)?);
    }
    stack_scenarios(&slabs)
}
