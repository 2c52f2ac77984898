//! The StagePipeline orchestrates multiple stages.
//!
//! This module provides the main StagePipeline struct that chains
//! stages together using the builder pattern.

use crate::traits::{RunContext, Stage};
use anyhow::{Context, Result};
use data_loader::RecordSet;
use tracing;

/// Chains multiple stages together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = StagePipeline::new()
///     .add_stage(ContactColorFilter::new(schema.column(LogicalField::ContactSheetColor)))
///     .add_stage(RuleFilter::new(rules))
///     .add_stage(RecencyClassifier::new(called_col, "called", 365));
///
/// let classified = pipeline.apply(roster, &RunContext::new(now))?;
/// ```
pub struct StagePipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl StagePipeline {
    /// Create a new empty StagePipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Add a stage to the pipeline (builder pattern).
    pub fn add_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Add a stage only when `stage` is `Some`.
    pub fn add_optional_stage(self, stage: Option<impl Stage + 'static>) -> Self {
        match stage {
            Some(stage) => self.add_stage(stage),
            None => self,
        }
    }

    /// Names of the configured stages, in execution order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Apply all stages in sequence to the records.
    ///
    /// ## Algorithm
    /// 1. Start with the input records
    /// 2. For each stage in order:
    ///    a. Log stage name and input count
    ///    b. Apply the stage
    ///    c. Log output count
    /// 3. Return the final record set
    pub fn apply(&self, records: RecordSet, context: &RunContext) -> Result<RecordSet> {
        let mut current = records;
        for stage in &self.stages {
            tracing::debug!(
                "Applying stage: {} (input count: {})",
                stage.name(),
                current.len()
            );
            current = stage
                .apply(current, context)
                .with_context(|| format!("Stage '{}' failed", stage.name()))?;
            tracing::debug!(
                "Stage applied: {} (output count: {})",
                stage.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for StagePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::{FilterOp, FilterRule, RuleFilter};
    use chrono::{TimeZone, Utc};
    use data_loader::Record;

    fn roster() -> RecordSet {
        let mut set = RecordSet::new(vec!["Full Name".into(), "Mobile Phone".into()]);
        set.push(Record::from_pairs([("Full Name", "Ann Lee"), ("Mobile Phone", "555-0100")]));
        set.push(Record::from_pairs([("Full Name", "Bo Park"), ("Mobile Phone", "")]));
        set
    }

    fn context() -> RunContext {
        RunContext::new(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = StagePipeline::new();
        let result = pipeline.apply(roster(), &context()).unwrap();
        assert_eq!(result, roster());
    }

    #[test]
    fn test_single_stage() {
        let pipeline = StagePipeline::new().add_stage(RuleFilter::new(vec![FilterRule::new(
            "Mobile Phone",
            FilterOp::NotNull,
            "",
        )]));

        let result = pipeline.apply(roster(), &context()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.records()[0].value("Full Name"), "Ann Lee");
    }

    #[test]
    fn test_optional_stage_skipped() {
        let pipeline = StagePipeline::new().add_optional_stage(None::<RuleFilter>);
        assert!(pipeline.stage_names().is_empty());
    }
}
