//! Error types for pipeline configuration.
//!
//! Data problems never surface here: a blank or unparseable cell is a
//! property of the data and is handled by the stage that reads it. These
//! errors mean the pipeline itself was configured wrongly and no record
//! should be processed.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A filter rule names an operator this pipeline does not implement
    #[error("Unsupported filter op: {op} (column '{column}')")]
    UnsupportedOperator { column: String, op: String },

    /// A stage was built with a parameter outside its valid range
    #[error("Invalid configuration for {stage}: {reason}")]
    InvalidConfiguration { stage: String, reason: String },
}
