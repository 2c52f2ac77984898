//! Core traits for the record pipeline.
//!
//! This module defines the Stage trait that allows composable,
//! reorderable transformations to be applied to a roster table.

use anyhow::Result;
use chrono::{DateTime, Utc};
use data_loader::RecordSet;

/// Inputs every stage may depend on besides the records themselves.
///
/// "Now" is always passed in, never read from the clock inside a stage,
/// so that recency buckets and the month's contact color are reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    pub now: DateTime<Utc>,
}

impl RunContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

/// Core trait for transforming a record set.
///
/// All stages must implement this trait to be used in the StagePipeline.
///
/// ## Design Note
/// - `Send + Sync` allows stages to be shared behind an `Arc`
/// - Stages take ownership of the RecordSet and return a new one
/// - A stage must not rewrite derived columns written by an earlier stage
pub trait Stage: Send + Sync {
    /// Returns the name of this stage (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this stage to a record set.
    ///
    /// # Arguments
    /// * `records` - The records to transform (takes ownership)
    /// * `context` - Run-wide inputs such as the reference time
    fn apply(&self, records: RecordSet, context: &RunContext) -> Result<RecordSet>;
}
