//! Orchestrator crate for the call-list pipeline.
//!
//! This crate contains the orchestrator that wires loading, the record
//! pipeline, ranking and schedule enrichment into one run, plus the
//! artifact writers and the best-effort git publisher.

pub mod config;
pub mod orchestrator;
pub mod output;
pub mod publish;

pub use config::PipelineConfig;
pub use orchestrator::{CallListOrchestrator, RunOutcome, ScheduleOutcome};
pub use output::{ArtifactWriter, Artifacts, render_csv, render_json, render_processed_schedule, write_processed_schedule};
pub use publish::{GitPublisher, PublishError, publish_best_effort};
