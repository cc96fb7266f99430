//! Application constants for the ERF processor
//!
//! Column names, filename conventions, and default values used
//! throughout the pipeline.

// =============================================================================
// Time Axis
// =============================================================================

/// Name of the integer year index column present in every input CSV
pub const YEAR_COLUMN: &str = "year";

/// First year of the historical ERF record
pub const START_YEAR: i64 = 1750;

/// Historical values take precedence up to and including this year;
/// scenario-native values are used strictly after it
pub const DEFAULT_CUTOFF_YEAR: i64 = 2019;

// =============================================================================
// Input File Conventions
// =============================================================================

/// Historical ERF file inside the input directory
pub const HISTORICAL_FILE: &str = "AR6_ERF_1750-2019.csv";

/// Historical minor-greenhouse-gas ERF file inside the input directory
pub const HISTORICAL_MINOR_FILE: &str = "AR6_ERF_minorGHGs_1750-2019.csv";

/// Subdirectory of the input directory holding per-scenario files
pub const SCENARIO_DIR: &str = "SSPs";

/// Substring marking a scenario file as the minor-greenhouse-gas variant
pub const MINOR_GHGS_MARKER: &str = "minorGHGs";

// =============================================================================
// Forcing Variable Names
// =============================================================================

pub const AEROSOL_CLOUD: &str = "aerosol-cloud_interactions";
pub const AEROSOL_RADIATION: &str = "aerosol-radiation_interactions";
pub const BC_ON_SNOW: &str = "bc_on_snow";

/// Derived: `aerosol-cloud_interactions + aerosol-radiation_interactions`
pub const AEROSOL_TOTAL: &str = "aerosol-total";

/// Derived: `aerosol-total + bc_on_snow`
pub const AEROSOL_TOTAL_WITH_BC: &str = "aerosol-total-with_bc";

/// Derived: row-wise sum over every minor-gas column containing [`HFC_MARKER`]
pub const HFCS_COLUMN: &str = "HFCs";

/// Substring selecting hydrofluorocarbon columns in the minor-gas table
pub const HFC_MARKER: &str = "HFC";

// =============================================================================
// Output
// =============================================================================

/// Name of the value variable in the persisted long-form dataset
pub const ERF_VARIABLE: &str = "ERF";

/// Scenario and variable coordinate column names in the persisted dataset
pub const SCENARIO_COLUMN: &str = "scenario";
pub const VARIABLE_COLUMN: &str = "variable";

/// Default output directory name, created as a sibling of the input directory
pub const DEFAULT_OUTPUT_DIR: &str = "data_out";
