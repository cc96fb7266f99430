//! Derived forcing columns
//!
//! Adds the aggregate columns the downstream figures need:
//! `aerosol-total`, `aerosol-total-with_bc`, and the HFC sum computed in
//! the minor-gas table and copied into the main table.

use crate::constants::{
    AEROSOL_CLOUD, AEROSOL_RADIATION, AEROSOL_TOTAL, AEROSOL_TOTAL_WITH_BC, BC_ON_SNOW,
    HFC_MARKER, HFCS_COLUMN, YEAR_COLUMN,
};
use crate::error::{ErfError, Result};
use crate::pipeline::loader::ScenarioCollection;

use polars::prelude::*;
use tracing::debug;

fn require_column(scenario: &str, table_name: &str, table: &DataFrame, column: &str) -> Result<()> {
    if table.column(column).is_err() {
        return Err(ErfError::MissingColumn {
            scenario: scenario.to_string(),
            table: table_name.to_string(),
            column: column.to_string(),
        });
    }
    Ok(())
}

/// Add `aerosol-total` and `aerosol-total-with_bc` to a main table
pub fn add_aerosol_totals(scenario: &str, table: &DataFrame) -> Result<DataFrame> {
    for column in [AEROSOL_CLOUD, AEROSOL_RADIATION, BC_ON_SNOW] {
        require_column(scenario, "main", table, column)?;
    }

    let result = table
        .clone()
        .lazy()
        .with_columns([(col(AEROSOL_CLOUD) + col(AEROSOL_RADIATION)).alias(AEROSOL_TOTAL)])
        .with_columns([(col(AEROSOL_TOTAL) + col(BC_ON_SNOW)).alias(AEROSOL_TOTAL_WITH_BC)])
        .collect()?;

    Ok(result)
}

/// Names of the hydrofluorocarbon columns in a minor-gas table
pub fn hfc_columns(table: &DataFrame) -> Vec<String> {
    table
        .get_columns()
        .iter()
        .map(|c| c.name().to_string())
        .filter(|name| name.contains(HFC_MARKER))
        .collect()
}

/// Add the `HFCs` column (row-wise sum over all HFC-named columns) to a
/// minor-gas table. A minor table without any HFC column is malformed
/// input and aborts the run.
pub fn add_hfc_sum(scenario: &str, minor: &DataFrame) -> Result<DataFrame> {
    let columns = hfc_columns(minor);
    let mut exprs = columns.iter().map(|n| col(n.as_str()));
    let first = exprs.next().ok_or_else(|| ErfError::MissingColumn {
        scenario: scenario.to_string(),
        table: "minor-gas".to_string(),
        column: format!("{}*", HFC_MARKER),
    })?;

    debug!(
        "Summing {} HFC columns for scenario '{}'",
        columns.len(),
        scenario
    );

    let summed = exprs.fold(first, |acc, e| acc + e);
    let result = minor
        .clone()
        .lazy()
        .with_columns([summed.alias(HFCS_COLUMN)])
        .collect()?;

    Ok(result)
}

/// Copy the minor table's `HFCs` column into the main table, matched on
/// year. Rows stay sorted by year.
pub fn copy_hfcs_into_main(scenario: &str, main: &DataFrame, minor: &DataFrame) -> Result<DataFrame> {
    require_column(scenario, "minor-gas", minor, HFCS_COLUMN)?;

    let hfcs = minor
        .clone()
        .lazy()
        .select([col(YEAR_COLUMN), col(HFCS_COLUMN)]);

    let result = main
        .clone()
        .lazy()
        .join(
            hfcs,
            [col(YEAR_COLUMN)],
            [col(YEAR_COLUMN)],
            JoinArgs::new(JoinType::Left),
        )
        .sort_by_exprs([col(YEAR_COLUMN)], SortMultipleOptions::default())
        .collect()?;

    Ok(result)
}

/// Run every aggregation over a harmonized scenario collection in place
pub fn aggregate_collection(collection: &mut ScenarioCollection) -> Result<()> {
    let ScenarioCollection { main, minor } = collection;

    for (scenario, table) in minor.iter_mut() {
        *table = add_hfc_sum(scenario, table)?;
    }

    for (scenario, table) in main.iter_mut() {
        *table = add_aerosol_totals(scenario, table)?;

        let minor_table = minor
            .get(scenario)
            .ok_or_else(|| ErfError::MissingScenarioTable {
                scenario: scenario.clone(),
                kind: "minor-gas".to_string(),
            })?;
        *table = copy_hfcs_into_main(scenario, table, minor_table)?;
    }

    Ok(())
}
