//! ERF Processor Library
//!
//! A Rust library for merging historical and scenario-based effective
//! radiative forcing (ERF) time series from CSV sources into stacked
//! (scenario, variable, year) datasets.
//!
//! This library provides tools for:
//! - Loading the AR6 historical ERF tables and per-scenario SSP tables
//! - Harmonizing scenarios against the historical record up to a cutoff year
//! - Aggregating related forcing components (aerosol totals, HFC sum)
//! - Stacking per-scenario tables into a labeled three-dimensional array
//! - Writing and reading the array as self-describing Parquet datasets

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod pipeline;

pub use config::{CompressionAlgorithm, ErfConfig};
pub use error::{ErfError, Result};
pub use models::{DatasetKind, ErfDataArray, ProcessingStats};
pub use pipeline::ErfProcessor;
