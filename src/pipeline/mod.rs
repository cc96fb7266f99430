//! ERF processing pipeline
//!
//! Orchestrates the five-stage workflow: load the historical and
//! scenario CSVs, harmonize scenarios against the historical record,
//! add the aggregate forcing columns, reshape into the stacked
//! (scenario, variable, year) array, and write the two output datasets.
//! Every stage runs exactly once, synchronously, in fixed order.

pub mod aggregator;
pub mod harmonizer;
pub mod loader;
pub mod reshaper;
pub mod writer;

use crate::config::ErfConfig;
use crate::error::{ErfError, Result};
use crate::models::{DatasetKind, ProcessingStats};

use colored::*;
use std::time::Instant;
use tracing::debug;

use self::writer::ArrayWriter;

/// Main processor for one ERF dataset conversion run
#[derive(Debug)]
pub struct ErfProcessor {
    config: ErfConfig,
}

impl ErfProcessor {
    /// Create a new processor, verifying the input directory exists
    pub fn new(config: ErfConfig) -> Result<Self> {
        if !config.input_dir.exists() {
            return Err(ErfError::InputNotFound {
                path: config.input_dir.clone(),
            });
        }
        Ok(Self { config })
    }

    /// Run the full pipeline and return run statistics
    pub fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        println!("{}", "Starting ERF dataset processing".bright_green().bold());
        println!(
            "  {} {}",
            "Input:".bright_cyan(),
            self.config.input_dir.display()
        );
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            self.config.output_dir.display()
        );

        // Step 1: Load historical tables and discover scenario files
        println!("\n{}", "Loading CSV inputs...".bright_yellow());
        let historical = loader::load_historical(&self.config)?;
        let mut collection = loader::load_scenarios(&self.config)?;
        println!(
            "  {} {} scenarios ({} with minor-gas tables)",
            "Found".bright_green(),
            collection.main.len().to_string().bright_white().bold(),
            collection.minor.len().to_string().bright_white().bold()
        );

        // Step 2: Harmonize against the historical record
        println!(
            "\n{}",
            format!(
                "Harmonizing scenarios with historical data up to {}...",
                self.config.cutoff_year
            )
            .bright_yellow()
        );
        harmonizer::harmonize_collection(
            &mut collection.main,
            &historical.main,
            self.config.cutoff_year,
        )?;
        harmonizer::harmonize_collection(
            &mut collection.minor,
            &historical.minor,
            self.config.cutoff_year,
        )?;

        // Step 3: Derived columns (aerosol totals, HFC sum)
        println!("\n{}", "Computing aggregate forcings...".bright_yellow());
        aggregator::aggregate_collection(&mut collection)?;

        // Step 4: Reshape into stacked arrays
        println!("\n{}", "Stacking scenario arrays...".bright_yellow());
        let main_array = reshaper::collection_to_array(&collection.main)?;
        let minor_array = reshaper::collection_to_array(&collection.minor)?;
        let (scenarios, main_variables, years) = main_array.shape();
        debug!(
            "Stacked arrays: main {:?}, minor {:?}",
            main_array.shape(),
            minor_array.shape()
        );

        // Step 5: Write both datasets and check the main one reads back
        println!("\n{}", "Writing output datasets...".bright_yellow());
        let array_writer = ArrayWriter::new(
            self.config.output_dir.clone(),
            self.config.compression.clone(),
        );
        let (main_path, main_rows) = array_writer.write(&main_array, DatasetKind::Main)?;
        let (minor_path, minor_rows) = array_writer.write(&minor_array, DatasetKind::MinorGhgs)?;

        let check = writer::read_erf_dataset(&main_path)?;
        if check.shape() != main_array.shape() {
            return Err(ErfError::MalformedDataset {
                path: main_path,
                reason: format!(
                    "read-back shape {:?} differs from written shape {:?}",
                    check.shape(),
                    main_array.shape()
                ),
            });
        }

        let total_time = start_time.elapsed().as_millis();
        println!("\n{}", "Processing Summary".bright_green().bold());
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            total_time.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Scenarios:".bright_cyan(),
            scenarios.to_string().bright_white().bold()
        );
        println!(
            "  {} {} main, {} minor-gas",
            "Variables:".bright_cyan(),
            main_variables.to_string().bright_white(),
            minor_array.variables.len().to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Rows written:".bright_cyan(),
            (main_rows + minor_rows).to_string().bright_white().bold()
        );
        println!(
            "  {} {}",
            "Main dataset:".bright_cyan(),
            main_path.display()
        );
        println!(
            "  {} {}",
            "Minor-gas dataset:".bright_cyan(),
            minor_path.display()
        );

        Ok(ProcessingStats {
            scenarios_processed: scenarios,
            main_variables,
            minor_variables: minor_array.variables.len(),
            years_covered: years,
            rows_written: main_rows + minor_rows,
            output_paths: vec![main_path, minor_path],
            processing_time_ms: total_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_processor_rejects_missing_input_dir() {
        let config = ErfConfig::new(Path::new("/nonexistent/data_in"));
        let result = ErfProcessor::new(config);
        assert!(matches!(result, Err(ErfError::InputNotFound { .. })));
    }
}
