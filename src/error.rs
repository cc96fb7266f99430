//! Error handling for ERF processing operations.
//!
//! Provides error types with context for CSV loading, harmonization,
//! aggregation, and array reshaping failures. Every failure aborts the
//! run; the variants exist to carry context, not to enable recovery.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ErfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Cannot parse scenario name from file: {path} - {reason}")]
    InvalidScenarioFilename { path: PathBuf, reason: String },

    #[error("Missing column '{column}' in {table} table for scenario '{scenario}'")]
    MissingColumn {
        scenario: String,
        table: String,
        column: String,
    },

    #[error("Scenario '{scenario}' has no {kind} table")]
    MissingScenarioTable { scenario: String, kind: String },

    #[error("Table for scenario '{scenario}' has no '{column}' index column")]
    MissingYearColumn { scenario: String, column: String },

    #[error("Year index for scenario '{scenario}' is not strictly increasing: {details}")]
    NonMonotonicYears { scenario: String, details: String },

    #[error("Cannot merge scenario '{scenario}' into the stacked array: {details}")]
    MergeMismatch { scenario: String, details: String },

    #[error("No scenario files found in directory: {path}")]
    EmptyCollection { path: PathBuf },

    #[error("Scenario collection is empty; nothing to stack")]
    EmptyStack,

    #[error("Malformed dataset file: {path} - {reason}")]
    MalformedDataset { path: PathBuf, reason: String },

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, ErfError>;
