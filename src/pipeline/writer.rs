//! Persisting the stacked forcing array
//!
//! The array is melted to a long-form table (`scenario`, `variable`,
//! `year`, `ERF`) and written as Parquet, one file per dataset kind.
//! `read_erf_dataset` performs the inverse, reconstructing the labeled
//! array from a written file.

use crate::config::CompressionAlgorithm;
use crate::constants::{ERF_VARIABLE, SCENARIO_COLUMN, VARIABLE_COLUMN, YEAR_COLUMN};
use crate::error::{ErfError, Result};
use crate::models::{DatasetKind, ErfDataArray};

use ndarray::Array3;
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes stacked forcing arrays into an output directory
#[derive(Debug)]
pub struct ArrayWriter {
    output_dir: PathBuf,
    compression: CompressionAlgorithm,
}

impl ArrayWriter {
    pub fn new(output_dir: PathBuf, compression: CompressionAlgorithm) -> Self {
        Self {
            output_dir,
            compression,
        }
    }

    /// Write one dataset to its fixed output file. Returns the output
    /// path and the number of long-form rows written.
    pub fn write(&self, array: &ErfDataArray, kind: DatasetKind) -> Result<(PathBuf, usize)> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(kind.output_file_name());

        let mut frame = array_to_long_frame(array)?;
        let rows = frame.height();

        debug!(
            "Writing {:?} dataset: {} rows to {}",
            kind,
            rows,
            path.display()
        );

        let file = File::create(&path)?;
        ParquetWriter::new(file)
            .with_compression(self.compression.to_polars_compression())
            .with_statistics(StatisticsOptions::full())
            .finish(&mut frame)?;

        Ok((path, rows))
    }
}

/// Melt a labeled array into a long-form DataFrame with one row per
/// (scenario, variable, year) coordinate triple
pub fn array_to_long_frame(array: &ErfDataArray) -> Result<DataFrame> {
    let (ns, nv, ny) = array.shape();
    let total = ns * nv * ny;

    let mut scenarios: Vec<&str> = Vec::with_capacity(total);
    let mut variables: Vec<&str> = Vec::with_capacity(total);
    let mut years: Vec<i64> = Vec::with_capacity(total);
    let mut values: Vec<f64> = Vec::with_capacity(total);

    for (si, scenario) in array.scenarios.iter().enumerate() {
        for (vi, variable) in array.variables.iter().enumerate() {
            for (yi, year) in array.years.iter().enumerate() {
                scenarios.push(scenario.as_str());
                variables.push(variable.as_str());
                years.push(*year);
                values.push(array.values[[si, vi, yi]]);
            }
        }
    }

    let frame = DataFrame::new(vec![
        Column::new(SCENARIO_COLUMN.into(), scenarios),
        Column::new(VARIABLE_COLUMN.into(), variables),
        Column::new(YEAR_COLUMN.into(), years),
        Column::new(ERF_VARIABLE.into(), values),
    ])?;

    Ok(frame)
}

/// Read a written dataset file back into the labeled array. Coordinate
/// order follows first occurrence in the file, which for files produced
/// by [`ArrayWriter`] reproduces the original ordering.
pub fn read_erf_dataset(path: &Path) -> Result<ErfDataArray> {
    if !path.exists() {
        return Err(ErfError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let frame = ParquetReader::new(File::open(path)?).finish()?;

    let scenario_col = frame.column(SCENARIO_COLUMN)?.str()?;
    let variable_col = frame.column(VARIABLE_COLUMN)?.str()?;
    let year_col = frame.column(YEAR_COLUMN)?.i64()?;
    let value_col = frame.column(ERF_VARIABLE)?.f64()?;

    let malformed = |reason: &str| ErfError::MalformedDataset {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let mut scenarios: Vec<String> = Vec::new();
    let mut variables: Vec<String> = Vec::new();
    let mut years: Vec<i64> = Vec::new();
    let mut scenario_index: HashMap<String, usize> = HashMap::new();
    let mut variable_index: HashMap<String, usize> = HashMap::new();
    let mut year_index: HashMap<i64, usize> = HashMap::new();

    for i in 0..frame.height() {
        let scenario = scenario_col
            .get(i)
            .ok_or_else(|| malformed("null scenario coordinate"))?;
        let variable = variable_col
            .get(i)
            .ok_or_else(|| malformed("null variable coordinate"))?;
        let year = year_col
            .get(i)
            .ok_or_else(|| malformed("null year coordinate"))?;

        if !scenario_index.contains_key(scenario) {
            scenario_index.insert(scenario.to_string(), scenarios.len());
            scenarios.push(scenario.to_string());
        }
        if !variable_index.contains_key(variable) {
            variable_index.insert(variable.to_string(), variables.len());
            variables.push(variable.to_string());
        }
        if !year_index.contains_key(&year) {
            year_index.insert(year, years.len());
            years.push(year);
        }
    }

    if frame.height() != scenarios.len() * variables.len() * years.len() {
        return Err(malformed("row count does not span the coordinate grid"));
    }

    let mut values = Array3::from_elem((scenarios.len(), variables.len(), years.len()), f64::NAN);
    for i in 0..frame.height() {
        // Coordinates were validated non-null above
        let si = scenario_index[scenario_col.get(i).ok_or_else(|| malformed("null scenario"))?];
        let vi = variable_index[variable_col.get(i).ok_or_else(|| malformed("null variable"))?];
        let yi = year_index[&year_col.get(i).ok_or_else(|| malformed("null year"))?];
        if let Some(v) = value_col.get(i) {
            values[[si, vi, yi]] = v;
        }
    }

    Ok(ErfDataArray {
        scenarios,
        variables,
        years,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_array() -> ErfDataArray {
        let mut values = Array3::from_elem((2, 2, 3), 0.0);
        values[[0, 0, 0]] = 2.5;
        values[[0, 1, 1]] = -1.3;
        values[[1, 0, 2]] = 4.25;
        values[[1, 1, 0]] = f64::NAN;

        ErfDataArray {
            scenarios: vec!["ssp119".to_string(), "ssp585".to_string()],
            variables: vec!["total_anthropogenic".to_string(), "aerosol-total".to_string()],
            years: vec![2019, 2020, 2021],
            values,
        }
    }

    #[test]
    fn test_long_frame_shape_and_columns() {
        let frame = array_to_long_frame(&sample_array()).unwrap();

        assert_eq!(frame.height(), 12);
        assert!(frame.column("scenario").is_ok());
        assert!(frame.column("variable").is_ok());
        assert!(frame.column("year").is_ok());
        assert!(frame.column("ERF").is_ok());
    }

    #[test]
    fn test_round_trip_reproduces_values() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ArrayWriter::new(
            temp_dir.path().to_path_buf(),
            CompressionAlgorithm::Snappy,
        );

        let array = sample_array();
        let (path, rows) = writer.write(&array, DatasetKind::Main).unwrap();
        assert_eq!(rows, 12);
        assert!(path.ends_with("ERF_data.parquet"));

        let restored = read_erf_dataset(&path).unwrap();
        assert_eq!(restored.scenarios, array.scenarios);
        assert_eq!(restored.variables, array.variables);
        assert_eq!(restored.years, array.years);
        assert_eq!(
            restored.value("ssp119", "total_anthropogenic", 2019),
            Some(2.5)
        );
        assert_eq!(restored.value("ssp585", "total_anthropogenic", 2021), Some(4.25));
        assert!(restored.value("ssp585", "aerosol-total", 2019).unwrap().is_nan());
    }

    #[test]
    fn test_minor_dataset_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ArrayWriter::new(
            temp_dir.path().to_path_buf(),
            CompressionAlgorithm::Uncompressed,
        );

        let (path, _) = writer.write(&sample_array(), DatasetKind::MinorGhgs).unwrap();
        assert!(path.ends_with("ERF_minorGHGs_data.parquet"));
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_erf_dataset(Path::new("/nonexistent/ERF_data.parquet"));
        assert!(matches!(result, Err(ErfError::InputNotFound { .. })));
    }

    #[test]
    fn test_writer_creates_output_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("out").join("nested");
        let writer = ArrayWriter::new(nested.clone(), CompressionAlgorithm::Snappy);

        writer.write(&sample_array(), DatasetKind::Main).unwrap();
        assert!(nested.join("ERF_data.parquet").exists());
    }
}
