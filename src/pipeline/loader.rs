//! Input loading for ERF datasets
//!
//! Reads the historical CSVs and discovers/reads the per-scenario CSVs
//! into year-indexed DataFrames. Scenario files live in one flat
//! subdirectory and encode the scenario identifier as the second
//! underscore-separated filename token, with an optional "minorGHGs"
//! marker distinguishing the minor-greenhouse-gas variant:
//!
//! ```text
//! data_in/
//!   AR6_ERF_1750-2019.csv
//!   AR6_ERF_minorGHGs_1750-2019.csv
//!   SSPs/
//!     ERF_ssp119_1750-2500.csv
//!     ERF_ssp119_minorGHGs_1750-2500.csv
//!     ERF_ssp585_1750-2500.csv
//!     ERF_ssp585_minorGHGs_1750-2500.csv
//! ```

use crate::config::ErfConfig;
use crate::constants::{MINOR_GHGS_MARKER, YEAR_COLUMN};
use crate::error::{ErfError, Result};
use crate::models::DatasetKind;

use glob::glob;
use polars::prelude::*;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// One discovered scenario file
#[derive(Debug, Clone)]
pub struct ScenarioFile {
    pub scenario: String,
    pub kind: DatasetKind,
    pub path: PathBuf,
}

/// The two historical reference tables
#[derive(Debug)]
pub struct HistoricalTables {
    pub main: DataFrame,
    pub minor: DataFrame,
}

/// Ordered scenario -> table mappings, one per dataset kind
#[derive(Debug, Default)]
pub struct ScenarioCollection {
    pub main: BTreeMap<String, DataFrame>,
    pub minor: BTreeMap<String, DataFrame>,
}

/// Matches `<prefix>_<scenario>_<rest>.csv`, capturing the scenario token
fn scenario_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]+_([A-Za-z0-9.-]+)_.+\.csv$").expect("static pattern compiles")
    })
}

/// Extract the scenario identifier and dataset kind from a file name
pub fn parse_scenario_file(path: &Path) -> Result<ScenarioFile> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ErfError::InvalidScenarioFilename {
            path: path.to_path_buf(),
            reason: "file name is not valid UTF-8".to_string(),
        })?;

    let captures = scenario_token_regex().captures(file_name).ok_or_else(|| {
        ErfError::InvalidScenarioFilename {
            path: path.to_path_buf(),
            reason: "expected '<prefix>_<scenario>_<range>.csv'".to_string(),
        }
    })?;

    let scenario = captures[1].to_string();
    if scenario == MINOR_GHGS_MARKER {
        // The marker sits where the scenario token belongs
        return Err(ErfError::InvalidScenarioFilename {
            path: path.to_path_buf(),
            reason: "scenario token missing before 'minorGHGs' marker".to_string(),
        });
    }

    let kind = if file_name.contains(MINOR_GHGS_MARKER) {
        DatasetKind::MinorGhgs
    } else {
        DatasetKind::Main
    };

    Ok(ScenarioFile {
        scenario,
        kind,
        path: path.to_path_buf(),
    })
}

/// Read one ERF CSV into a year-indexed DataFrame.
///
/// Requires a `year` column; casts it to Int64 and every other column to
/// Float64. Unparseable cells become nulls, which later surface as NaN in
/// the stacked array.
pub fn read_erf_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(ErfError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!("Reading ERF CSV: {}", path.display());

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let names: Vec<String> = df
        .get_columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    if !names.iter().any(|n| n == YEAR_COLUMN) {
        return Err(ErfError::MissingYearColumn {
            scenario: path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default(),
            column: YEAR_COLUMN.to_string(),
        });
    }

    let casts: Vec<Expr> = names
        .iter()
        .map(|name| {
            if name == YEAR_COLUMN {
                col(name.as_str()).cast(DataType::Int64)
            } else {
                col(name.as_str()).cast(DataType::Float64)
            }
        })
        .collect();

    Ok(df.lazy().with_columns(casts).collect()?)
}

/// Load the historical main and minor-greenhouse-gas tables
pub fn load_historical(config: &ErfConfig) -> Result<HistoricalTables> {
    let main = read_erf_csv(&config.historical_path())?;
    let minor = read_erf_csv(&config.historical_minor_path())?;

    debug!(
        "Historical tables loaded: {} main columns, {} minor columns",
        main.width(),
        minor.width()
    );

    Ok(HistoricalTables { main, minor })
}

/// Discover all scenario CSV files in the scenario directory
pub fn discover_scenario_files(dir: &Path) -> Result<Vec<ScenarioFile>> {
    if !dir.exists() {
        return Err(ErfError::InputNotFound {
            path: dir.to_path_buf(),
        });
    }

    let pattern = dir.join("*.csv");
    let pattern = pattern.to_string_lossy();

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in glob(&pattern).map_err(|e| ErfError::Io(std::io::Error::other(e)))? {
        paths.push(entry.map_err(|e| ErfError::Io(e.into_error()))?);
    }
    // Glob order is platform-dependent; sort for a deterministic run
    paths.sort();

    if paths.is_empty() {
        return Err(ErfError::EmptyCollection {
            path: dir.to_path_buf(),
        });
    }

    let files = paths
        .iter()
        .map(|p| parse_scenario_file(p))
        .collect::<Result<Vec<_>>>()?;

    debug!("Discovered {} scenario files in {}", files.len(), dir.display());

    Ok(files)
}

/// Load every scenario file into the two ordered collections
pub fn load_scenarios(config: &ErfConfig) -> Result<ScenarioCollection> {
    let files = discover_scenario_files(&config.scenario_path())?;

    let mut collection = ScenarioCollection::default();
    for file in files {
        let table = read_erf_csv(&file.path)?;
        match file.kind {
            DatasetKind::Main => collection.main.insert(file.scenario, table),
            DatasetKind::MinorGhgs => collection.minor.insert(file.scenario, table),
        };
    }

    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_main_scenario_file() {
        let file = parse_scenario_file(Path::new("ERF_ssp119_1750-2500.csv")).unwrap();
        assert_eq!(file.scenario, "ssp119");
        assert_eq!(file.kind, DatasetKind::Main);
    }

    #[test]
    fn test_parse_minor_scenario_file() {
        let file = parse_scenario_file(Path::new("ERF_ssp585_minorGHGs_1750-2500.csv")).unwrap();
        assert_eq!(file.scenario, "ssp585");
        assert_eq!(file.kind, DatasetKind::MinorGhgs);
    }

    #[test]
    fn test_parse_hyphenated_scenario_name() {
        let file =
            parse_scenario_file(Path::new("ERF_ssp370-lowNTCF-aerchemmip_1750-2500.csv")).unwrap();
        assert_eq!(file.scenario, "ssp370-lowNTCF-aerchemmip");
    }

    #[test]
    fn test_parse_rejects_missing_scenario_token() {
        let result = parse_scenario_file(Path::new("ERF_minorGHGs_1750-2500.csv"));
        assert!(matches!(
            result,
            Err(ErfError::InvalidScenarioFilename { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_unstructured_name() {
        let result = parse_scenario_file(Path::new("notes.csv"));
        assert!(matches!(
            result,
            Err(ErfError::InvalidScenarioFilename { .. })
        ));
    }

    #[test]
    fn test_read_erf_csv_casts_columns() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_csv(
            temp_dir.path(),
            "hist.csv",
            "year,co2,ch4\n1750,0.0,0.0\n1751,0.011,0.004\n",
        );

        let df = read_erf_csv(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("year").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("co2").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("ch4").unwrap().f64().unwrap().get(1), Some(0.004));
    }

    #[test]
    fn test_read_erf_csv_requires_year_column() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_csv(temp_dir.path(), "bad.csv", "time,co2\n1750,0.0\n");

        let result = read_erf_csv(&path);
        assert!(matches!(result, Err(ErfError::MissingYearColumn { .. })));
    }

    #[test]
    fn test_read_erf_csv_missing_file() {
        let result = read_erf_csv(Path::new("/nonexistent/hist.csv"));
        assert!(matches!(result, Err(ErfError::InputNotFound { .. })));
    }

    #[test]
    fn test_discover_ignores_non_csv_files() {
        let temp_dir = TempDir::new().unwrap();
        write_csv(temp_dir.path(), "ERF_ssp119_1750-2500.csv", "year,co2\n1750,0.0\n");
        fs::write(temp_dir.path().join("README.txt"), "notes").unwrap();

        let files = discover_scenario_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].scenario, "ssp119");
    }

    #[test]
    fn test_discover_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = discover_scenario_files(temp_dir.path());
        assert!(matches!(result, Err(ErfError::EmptyCollection { .. })));
    }

    #[test]
    fn test_discover_missing_directory() {
        let result = discover_scenario_files(Path::new("/nonexistent/SSPs"));
        assert!(matches!(result, Err(ErfError::InputNotFound { .. })));
    }

    #[test]
    fn test_load_scenarios_splits_kinds_and_orders() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("data_in");
        let ssp_dir = input_dir.join("SSPs");
        fs::create_dir_all(&ssp_dir).unwrap();

        let csv = "year,co2\n1750,0.0\n";
        write_csv(&ssp_dir, "ERF_ssp585_1750-2500.csv", csv);
        write_csv(&ssp_dir, "ERF_ssp119_1750-2500.csv", csv);
        write_csv(&ssp_dir, "ERF_ssp119_minorGHGs_1750-2500.csv", csv);

        let config = ErfConfig::new(&input_dir);
        let collection = load_scenarios(&config).unwrap();

        let main_names: Vec<&String> = collection.main.keys().collect();
        assert_eq!(main_names, vec!["ssp119", "ssp585"]);
        assert_eq!(collection.minor.len(), 1);
        assert!(collection.minor.contains_key("ssp119"));
    }
}
