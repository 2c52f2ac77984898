//! # Call List Orchestrator
//!
//! This module coordinates one run of the call-list pipeline:
//! 1. Resolve the roster's header schema
//! 2. Consolidate names and guardian fallbacks
//! 3. Enrich the game schedule from the roster (optional branch)
//! 4. Keep this month's contact sheet color
//! 5. Apply the configured column rules
//! 6. Classify call (and text) recency
//! 7. Drop excluded callers and rank
//!
//! Time and randomness are inputs: the caller supplies `now` and the
//! random source, so a run is reproducible end to end.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::RngCore;
use tracing::{debug, info, instrument, warn};

use data_loader::{ContactColor, LogicalField, RecordSet, RosterSchema, load_table};
use pipeline::stages::{
    ContactColorFilter, FieldConsolidator, FilterRule, RecencyClassifier, RuleFilter, validate_recent_days,
};
use pipeline::{Exporter, ProjectionMode, RunContext, StagePipeline};
use ranking::{CALLED_PREFIX, CallerExclusion, Ranker, StrategyKind, TEXTED_PREFIX};
use schedule::{ColorLookup, GameRecord, ProcessedGame, ScheduleEnricher, SchedulePreprocessor};

use crate::config::PipelineConfig;

/// Schedule games before and after enrichment
#[derive(Debug, Clone, Default)]
pub struct ScheduleOutcome {
    pub processed: Vec<ProcessedGame>,
    pub games: Vec<GameRecord>,
}

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub schema: RosterSchema,
    /// Records that survived filtering, with recency columns, before
    /// caller exclusion
    pub classified: RecordSet,
    /// Records left after caller exclusion, least recently called first;
    /// projected into `players.json`
    pub players: RecordSet,
    /// The ranked selection, in selection order
    pub selected: RecordSet,
    pub schedule: Option<ScheduleOutcome>,
    pub month_color: ContactColor,
    pub strategy: String,
}

/// Wires every stage into one configurable run
pub struct CallListOrchestrator {
    config: PipelineConfig,
    rules: Vec<FilterRule>,
    preprocessor: SchedulePreprocessor,
}

impl CallListOrchestrator {
    /// Validate the configuration up front.
    ///
    /// An unsupported filter operator, an out-of-range `recent_days` or an
    /// unknown target timezone fails here, before any record is read.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let rules = FilterRule::parse_all(&config.filters).context("Invalid filter configuration")?;
        validate_recent_days(config.recent_days).context("Invalid recency window")?;
        let preprocessor = SchedulePreprocessor::from_timezone_name(&config.target_timezone)
            .context("Invalid target timezone")?
            .with_keep_year(config.keep_year.clone());

        Ok(Self {
            config,
            rules,
            preprocessor,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn preprocessor(&self) -> &SchedulePreprocessor {
        &self.preprocessor
    }

    /// Exporter for the top selection, using the configured projection
    pub fn exporter(&self, outcome: &RunOutcome) -> Exporter {
        Exporter::new(outcome.schema.clone(), self.config.projection)
    }

    /// Load the roster (and schedule, when given) from disk, then [`run`](Self::run).
    ///
    /// A missing roster is fatal. A missing schedule only skips enrichment.
    pub fn load_and_run(
        &self,
        roster_path: &Path,
        schedule_path: Option<&Path>,
        now: DateTime<Utc>,
        rng: &mut dyn RngCore,
    ) -> Result<RunOutcome> {
        let roster = load_table(roster_path)
            .with_context(|| format!("Failed to load roster {}", roster_path.display()))?;
        info!("loaded {} roster rows, columns: {:?}", roster.len(), roster.columns());

        let schedule = match schedule_path {
            Some(path) if path.exists() => Some(
                load_table(path).with_context(|| format!("Failed to load schedule {}", path.display()))?,
            ),
            Some(path) => {
                warn!("schedule {} not found, skipping enrichment", path.display());
                None
            }
            None => None,
        };

        self.run(roster, schedule.as_ref(), now, rng)
    }

    #[instrument(skip_all, fields(rows = roster.len(), strategy = %self.config.strategy))]
    pub fn run(
        &self,
        roster: RecordSet,
        schedule: Option<&RecordSet>,
        now: DateTime<Utc>,
        rng: &mut dyn RngCore,
    ) -> Result<RunOutcome> {
        let start_time = Instant::now();
        let context = RunContext::new(now);

        let schema = RosterSchema::resolve(roster.columns());
        for field in schema.unresolved() {
            debug!("no column resolved for {:?}", field);
        }

        let consolidated = StagePipeline::new()
            .add_stage(FieldConsolidator::new(
                self.config.name_pairs.clone(),
                self.config.guardian_slots.clone(),
            ))
            .apply(roster, &context)
            .context("Failed to consolidate roster")?;

        let mut schedule_outcome = None;
        if !self.config.enrich_after_color_filter {
            schedule_outcome = schedule.map(|s| self.enrich_schedule(s, &consolidated, &schema));
        }

        let color_filter = self
            .config
            .color_filter
            .then(|| ContactColorFilter::new(schema.column(LogicalField::ContactSheetColor)));
        let colored = StagePipeline::new()
            .add_optional_stage(color_filter)
            .apply(consolidated, &context)
            .context("Failed to apply color filter")?;

        if self.config.enrich_after_color_filter {
            schedule_outcome = schedule.map(|s| self.enrich_schedule(s, &colored, &schema));
        }

        let classified = self
            .classification_pipeline(&schema)
            .apply(colored, &context)
            .context("Failed to filter and classify roster")?;
        info!("{} records survived filtering", classified.len());

        let ranker = Ranker::from_kind(self.config.strategy, self.config.top_n).with_exclusion(
            CallerExclusion::new(schema.column(LogicalField::LastCallWith), &self.config.exclude_callers),
        );
        let picked = ranker.rank(&classified, rng);
        let selected = RecordSet::with_records(
            classified.columns().to_vec(),
            picked.into_iter().cloned().collect(),
        );
        let players = RecordSet::with_records(
            classified.columns().to_vec(),
            ranker.call_sheet(&classified).into_iter().cloned().collect(),
        );

        info!(
            "selected {} of {} records in {:.2?}",
            selected.len(),
            classified.len(),
            start_time.elapsed()
        );

        Ok(RunOutcome {
            strategy: ranker.strategy_name().to_string(),
            schema,
            classified,
            players,
            selected,
            schedule: schedule_outcome,
            month_color: ContactColor::for_date(&now),
        })
    }

    /// Rules, then call recency, then text recency when it is available or
    /// needed by the strategy
    fn classification_pipeline(&self, schema: &RosterSchema) -> StagePipeline {
        let recent_days = self.config.recent_days;
        let texted_column = schema.column(LogicalField::LastTexted);
        let texted = (texted_column.is_some() || self.config.strategy == StrategyKind::BucketPriority)
            .then(|| RecencyClassifier::new(texted_column, TEXTED_PREFIX, recent_days));

        StagePipeline::new()
            .add_stage(RuleFilter::new(self.rules.clone()))
            .add_stage(RecencyClassifier::new(
                schema.column(LogicalField::LastCalled),
                CALLED_PREFIX,
                recent_days,
            ))
            .add_optional_stage(texted)
    }

    fn enrich_schedule(&self, schedule: &RecordSet, roster: &RecordSet, schema: &RosterSchema) -> ScheduleOutcome {
        let processed = self.preprocessor.games_from_table(schedule);
        let lookup = ColorLookup::from_roster(roster, schema.column(LogicalField::ContactSheetColor));
        let games = ScheduleEnricher::new(lookup).enrich(&processed);
        ScheduleOutcome { processed, games }
    }
}

impl RunOutcome {
    /// Projection used for `players.json`, independent of the top list mode
    pub fn players_exporter(&self) -> Exporter {
        Exporter::new(self.schema.clone(), ProjectionMode::Detailed)
    }
}
