//! Command-line interface components.

use crate::config::{CompressionAlgorithm, ErfConfig};
use crate::constants::DEFAULT_CUTOFF_YEAR;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "erf_processor")]
#[command(about = "Merge AR6 ERF CSV time series into stacked scenario/variable/year datasets")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Input directory holding the historical CSVs and the SSPs subdirectory
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output directory for the two dataset files (default: sibling data_out)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Historical values replace scenario values up to and including this year
    #[arg(long, default_value_t = DEFAULT_CUTOFF_YEAR)]
    pub cutoff_year: i64,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the run configuration from the parsed arguments
    pub fn to_config(&self) -> anyhow::Result<ErfConfig> {
        let compression = CompressionAlgorithm::from_name(&self.compression)
            .with_context(|| format!("Unknown compression algorithm: {}", self.compression))?;

        let mut config = ErfConfig::new(&self.input_dir)
            .with_cutoff_year(self.cutoff_year)
            .with_compression(compression);

        if let Some(output_dir) = &self.output_dir {
            config = config.with_output_dir(output_dir);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["erf_processor", "/data/ar6/data_in"]);
        let config = args.to_config().unwrap();

        assert_eq!(config.input_dir, PathBuf::from("/data/ar6/data_in"));
        assert_eq!(config.output_dir, PathBuf::from("/data/ar6/data_out"));
        assert_eq!(config.cutoff_year, 2019);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "erf_processor",
            "/data/ar6/data_in",
            "--output-dir",
            "/tmp/out",
            "--cutoff-year",
            "2014",
            "--compression",
            "zstd",
        ]);
        let config = args.to_config().unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.cutoff_year, 2014);
        assert!(matches!(config.compression, CompressionAlgorithm::Zstd));
    }

    #[test]
    fn test_unknown_compression_is_rejected() {
        let args = Args::parse_from([
            "erf_processor",
            "/data/ar6/data_in",
            "--compression",
            "brotli",
        ]);
        assert!(args.to_config().is_err());
    }
}
