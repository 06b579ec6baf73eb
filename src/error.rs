//! Common errors across the fhs-rs crate
use std::path::PathBuf;

/// Errors related to deriving the observation time from a file name
#[derive(Debug, thiserror::Error)]
pub enum TimestampError {
    #[error("File name '{name}' has {ntok} underscore-separated parts, need at least {min}")]
    TooFewTokens { name: String, ntok: usize, min: usize },
    #[error("Time token '{0}' is not 14 digits (YYYYMMDDHHmmss)")]
    BadToken(String),
    #[error("Time token '{token}' is not a valid date and time: {cause}")]
    InvalidDateTime { token: String, cause: String },
    #[error("Shifting {0} to Beijing time overflowed")]
    Overflow(chrono::NaiveDateTime),
}

/// Errors related to splitting an FPT record into typed fields
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Record {index} has {got} fields, expected {expected}")]
    FieldCount { index: usize, got: usize, expected: usize },
    #[error("Record {index}, field '{field}': could not parse '{value}' as {kind}")]
    FieldValue { index: usize, field: &'static str, value: String, kind: &'static str },
}

/// Errors reading text records out of a netCDF file
#[derive(Debug, thiserror::Error)]
pub enum NcReadError {
    #[error("Could not open netCDF file {0}")]
    Open(PathBuf),
    #[error("Variable '{0}' not found")]
    MissingVariable(String),
    #[error("Variable '{varname}' has unsupported type {vartype}, expected string or char")]
    UnsupportedType { varname: String, vartype: String },
    #[error("Could not read values of variable '{0}'")]
    Read(String),
}

/// Errors while creating or amending an hourly CSV file
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("Could not read existing CSV file {0}")]
    ReadExisting(PathBuf),
    #[error("Could not write CSV file {0}")]
    Write(PathBuf),
}

/// Errors loading the program configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file {0} does not exist")]
    NotFound(PathBuf),
    #[error("Could not parse configuration (TOML, with quoted strings): {0}")]
    Parse(String),
}

/// The per-file failure kinds. Any of these causes the file to be skipped
/// without affecting the rest of the batch.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Could not open or read FHS file {0}")]
    FileOpen(PathBuf),
    #[error("FHS file {path} has no '{varname}' variable")]
    MissingVariable { path: PathBuf, varname: String },
    #[error("Malformed hotspot record in {0}")]
    Parse(PathBuf),
    #[error("Could not derive observation time from file name {0}")]
    FilenameFormat(PathBuf),
    #[error("Could not write output for {0}")]
    Output(PathBuf),
}

/// Errors that stop the whole batch
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Could not list source directory {0}")]
    ListSource(PathBuf),
}
