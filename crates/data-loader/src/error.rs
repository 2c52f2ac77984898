//! Error types for the data-loader crate.
//!
//! Only conditions that must abort a run live here. Per-value problems
//! (an unparseable date, a blank cell) are not errors: the stages that
//! read those values treat them as absent and log the fact.

use thiserror::Error;

/// Errors that can occur while loading a roster or schedule table
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The input file does not exist. Raised before anything is read.
    #[error("Input not found: {path}")]
    InputNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The delimited text could not be tokenized
    #[error("CSV error in {source_name}: {source}")]
    CsvError {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// The table has no header row at all
    #[error("No header row in {source_name}")]
    MissingHeader { source_name: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
