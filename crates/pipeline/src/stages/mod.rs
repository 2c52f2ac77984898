//! Stage implementations for the record pipeline.
//!
//! This module contains all the concrete stages that can be
//! composed into a StagePipeline.

pub mod color;
pub mod consolidate;
pub mod recency;
pub mod rules;

// Re-export for convenience
pub use color::ContactColorFilter;
pub use consolidate::{Consolidation, FieldConsolidator, GuardianSlot, NamePair};
pub use recency::{DEFAULT_RECENT_DAYS, MAX_RECENT_DAYS, RecencyClassifier, classify, parse_timestamp, validate_recent_days};
pub use rules::{FilterOp, FilterRule, RuleConfig, RuleFilter, apply_rules};
