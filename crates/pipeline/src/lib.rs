//! Pipeline for consolidating, filtering and classifying roster records.
//!
//! This crate provides:
//! - Stage trait and implementations for record transformation
//! - StagePipeline for composing stages
//! - Exporter for projecting records into output documents
//!
//! ## Architecture
//! The pipeline processes a roster in stages:
//! 1. FieldConsolidator merges name pairs and guardian fallbacks
//! 2. ContactColorFilter keeps this month's contact sheet
//! 3. RuleFilter applies the configured column rules
//! 4. RecencyClassifier buckets contact timestamps (called, texted)
//! 5. Exporter projects the survivors for output
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{RunContext, StagePipeline};
//! use pipeline::stages::*;
//!
//! let pipeline = StagePipeline::new()
//!     .add_stage(FieldConsolidator::default())
//!     .add_stage(ContactColorFilter::new(schema.column(LogicalField::ContactSheetColor)))
//!     .add_stage(RuleFilter::new(rules))
//!     .add_stage(RecencyClassifier::new(schema.column(LogicalField::LastCalled), "called", 365));
//!
//! let classified = pipeline.apply(roster, &RunContext::new(now))?;
//! let players = Exporter::new(schema, ProjectionMode::Detailed).project(&classified);
//! ```

pub mod error;
pub mod export;
pub mod stage_pipeline;
pub mod stages;
pub mod traits;

// Re-export main types
pub use error::PipelineError;
pub use export::{Exporter, PlayerEntry, PlayerProjection, PlayersDocument, ProjectionMode};
pub use stage_pipeline::StagePipeline;
pub use traits::{RunContext, Stage};
