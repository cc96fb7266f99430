//! Harmonization of scenario tables against the historical record
//!
//! Historical values take precedence up to and including the cutoff year;
//! scenario-native values are used strictly after it. If the two series
//! were not harmonized by the data provider this produces a visible jump
//! at the cutoff boundary - an accepted artifact of the source data, not
//! a bug.

use crate::constants::YEAR_COLUMN;
use crate::error::{ErfError, Result};

use polars::prelude::*;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Replace a scenario table's rows for years up to and including `cutoff`
/// with the historical rows, matched by column name and restricted to the
/// scenario's columns. Row order stays sorted by year.
pub fn harmonize(
    scenario: &str,
    table: &DataFrame,
    historical: &DataFrame,
    cutoff: i64,
) -> Result<DataFrame> {
    let columns: Vec<String> = table
        .get_columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let hist_columns: HashSet<&str> = historical
        .get_columns()
        .iter()
        .map(|c| c.name().as_str())
        .collect();

    for name in &columns {
        if !hist_columns.contains(name.as_str()) {
            return Err(ErfError::MissingColumn {
                scenario: scenario.to_string(),
                table: "historical".to_string(),
                column: name.clone(),
            });
        }
    }

    let selected: Vec<Expr> = columns.iter().map(|n| col(n.as_str())).collect();

    let hist_part = historical
        .clone()
        .lazy()
        .filter(col(YEAR_COLUMN).lt_eq(lit(cutoff)))
        .select(selected.clone());

    let scenario_part = table
        .clone()
        .lazy()
        .filter(col(YEAR_COLUMN).gt(lit(cutoff)))
        .select(selected);

    let harmonized = concat([hist_part, scenario_part], UnionArgs::default())?
        .sort_by_exprs([col(YEAR_COLUMN)], SortMultipleOptions::default())
        .collect()?;

    debug!(
        "Harmonized scenario '{}' up to {}: {} rows",
        scenario,
        cutoff,
        harmonized.height()
    );

    Ok(harmonized)
}

/// Harmonize every table in a scenario collection in place
pub fn harmonize_collection(
    tables: &mut BTreeMap<String, DataFrame>,
    historical: &DataFrame,
    cutoff: i64,
) -> Result<()> {
    for (scenario, table) in tables.iter_mut() {
        *table = harmonize(scenario, table, historical, cutoff)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn historical() -> DataFrame {
        df!(
            "year" => [2018i64, 2019],
            "total_anthropogenic" => [2.4, 2.5],
            "co2" => [2.0, 2.1],
        )
        .unwrap()
    }

    fn scenario_table() -> DataFrame {
        df!(
            "year" => [2018i64, 2019, 2020, 2021],
            "total_anthropogenic" => [9.9, 3.1, 3.3, 3.5],
            "co2" => [9.9, 2.6, 2.7, 2.8],
        )
        .unwrap()
    }

    #[test]
    fn test_historical_wins_up_to_cutoff() {
        let result = harmonize("ssp119", &scenario_table(), &historical(), 2019).unwrap();

        let total = result.column("total_anthropogenic").unwrap().f64().unwrap();
        // 2018 and 2019 come from the historical table
        assert_eq!(total.get(0), Some(2.4));
        assert_eq!(total.get(1), Some(2.5));
    }

    #[test]
    fn test_scenario_values_kept_after_cutoff() {
        let result = harmonize("ssp119", &scenario_table(), &historical(), 2019).unwrap();

        let total = result.column("total_anthropogenic").unwrap().f64().unwrap();
        assert_eq!(total.get(2), Some(3.3));
        assert_eq!(total.get(3), Some(3.5));

        let years = result.column("year").unwrap().i64().unwrap();
        let collected: Vec<i64> = years.into_iter().flatten().collect();
        assert_eq!(collected, vec![2018, 2019, 2020, 2021]);
    }

    #[test]
    fn test_cutoff_year_itself_is_historical() {
        // The documented end-to-end case: historical 2.5 overrides 3.1 at 2019
        let result = harmonize("ssp119", &scenario_table(), &historical(), 2019).unwrap();
        let total = result.column("total_anthropogenic").unwrap().f64().unwrap();
        assert_eq!(total.get(1), Some(2.5));
    }

    #[test]
    fn test_extra_historical_columns_are_ignored() {
        let hist = df!(
            "year" => [2018i64, 2019],
            "total_anthropogenic" => [2.4, 2.5],
            "co2" => [2.0, 2.1],
            "volcanic" => [0.1, 0.2],
        )
        .unwrap();

        let result = harmonize("ssp119", &scenario_table(), &hist, 2019).unwrap();
        assert_eq!(result.width(), 3);
        assert!(result.column("volcanic").is_err());
    }

    #[test]
    fn test_missing_historical_column_aborts() {
        let hist = df!(
            "year" => [2018i64, 2019],
            "total_anthropogenic" => [2.4, 2.5],
        )
        .unwrap();

        let result = harmonize("ssp119", &scenario_table(), &hist, 2019);
        assert!(matches!(
            result,
            Err(ErfError::MissingColumn { column, .. }) if column == "co2"
        ));
    }

    #[test]
    fn test_harmonize_collection_updates_every_scenario() {
        let mut tables = BTreeMap::new();
        tables.insert("ssp119".to_string(), scenario_table());
        tables.insert("ssp585".to_string(), scenario_table());

        harmonize_collection(&mut tables, &historical(), 2019).unwrap();

        for table in tables.values() {
            let total = table.column("total_anthropogenic").unwrap().f64().unwrap();
            assert_eq!(total.get(1), Some(2.5));
        }
    }
}
