//! Configuration for the ERF processing pipeline.
//!
//! Holds input/output locations, the harmonization cutoff year, and
//! output compression settings.

use crate::constants::{
    DEFAULT_CUTOFF_YEAR, DEFAULT_OUTPUT_DIR, HISTORICAL_FILE, HISTORICAL_MINOR_FILE, SCENARIO_DIR,
};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Supported compression algorithms for the output Parquet files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }

    /// Parse a user-supplied algorithm name (snappy, zstd, lz4, none)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "snappy" => Some(CompressionAlgorithm::Snappy),
            "zstd" => Some(CompressionAlgorithm::Zstd),
            "lz4" => Some(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Some(CompressionAlgorithm::Uncompressed),
            _ => None,
        }
    }
}

/// Global configuration for one processing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErfConfig {
    /// Directory holding the historical CSVs and the scenario subdirectory
    pub input_dir: PathBuf,

    /// Directory the two output datasets are written into
    pub output_dir: PathBuf,

    /// Historical ERF file name inside the input directory
    pub historical_file: String,

    /// Historical minor-greenhouse-gas file name inside the input directory
    pub historical_minor_file: String,

    /// Name of the scenario subdirectory inside the input directory
    pub scenario_dir: String,

    /// Historical values replace scenario values up to and including this year
    pub cutoff_year: i64,

    /// Compression for the output Parquet files
    pub compression: CompressionAlgorithm,
}

impl ErfConfig {
    /// Create a configuration for an input directory, with the output
    /// directory defaulting to a sibling `data_out`
    pub fn new(input_dir: impl AsRef<Path>) -> Self {
        let input_dir = input_dir.as_ref().to_path_buf();
        let output_dir = input_dir
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_OUTPUT_DIR);

        Self {
            input_dir,
            output_dir,
            historical_file: HISTORICAL_FILE.to_string(),
            historical_minor_file: HISTORICAL_MINOR_FILE.to_string(),
            scenario_dir: SCENARIO_DIR.to_string(),
            cutoff_year: DEFAULT_CUTOFF_YEAR,
            compression: CompressionAlgorithm::Snappy,
        }
    }

    /// Override the output directory
    pub fn with_output_dir(mut self, output_dir: impl AsRef<Path>) -> Self {
        self.output_dir = output_dir.as_ref().to_path_buf();
        self
    }

    /// Override the harmonization cutoff year
    pub fn with_cutoff_year(mut self, cutoff_year: i64) -> Self {
        self.cutoff_year = cutoff_year;
        self
    }

    /// Override the output compression algorithm
    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Full path of the historical ERF file
    pub fn historical_path(&self) -> PathBuf {
        self.input_dir.join(&self.historical_file)
    }

    /// Full path of the historical minor-greenhouse-gas file
    pub fn historical_minor_path(&self) -> PathBuf {
        self.input_dir.join(&self.historical_minor_file)
    }

    /// Full path of the scenario subdirectory
    pub fn scenario_path(&self) -> PathBuf {
        self.input_dir.join(&self.scenario_dir)
    }
}
