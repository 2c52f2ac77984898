//! Run configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it changes:
//!
//! ```json
//! { "strategy": "bucket_priority", "top_n": 10, "exclude_callers": ["Coach A"] }
//! ```

use anyhow::{Context, Result};
use pipeline::ProjectionMode;
use pipeline::stages::{DEFAULT_RECENT_DAYS, GuardianSlot, NamePair, RuleConfig};
use ranking::StrategyKind;
use schedule::DEFAULT_KEEP_YEAR;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_TARGET_TIMEZONE: &str = "America/New_York";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Column rules every kept record must satisfy
    pub filters: Vec<RuleConfig>,
    pub name_pairs: Vec<NamePair>,
    pub guardian_slots: Vec<GuardianSlot>,
    /// Callers whose last contacts are skipped when ranking
    pub exclude_callers: Vec<String>,
    pub top_n: usize,
    pub strategy: StrategyKind,
    pub recent_days: u32,
    pub projection: ProjectionMode,
    /// Keep only this month's contact sheet color
    pub color_filter: bool,
    /// Build the schedule color lookup from the color-filtered roster
    /// instead of the whole consolidated roster
    pub enrich_after_color_filter: bool,
    /// Seed for random selection; unset draws from the OS
    pub seed: Option<u64>,
    pub keep_year: String,
    pub target_timezone: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            filters: vec![RuleConfig {
                column: "Mobile Phone".to_string(),
                op: "notnull".to_string(),
                value: String::new(),
            }],
            name_pairs: NamePair::defaults(),
            guardian_slots: GuardianSlot::defaults(),
            exclude_callers: Vec::new(),
            top_n: DEFAULT_TOP_N,
            strategy: StrategyKind::default(),
            recent_days: DEFAULT_RECENT_DAYS,
            projection: ProjectionMode::default(),
            color_filter: true,
            enrich_after_color_filter: false,
            seed: None,
            keep_year: DEFAULT_KEEP_YEAR.to_string(),
            target_timezone: DEFAULT_TARGET_TIMEZONE.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse pipeline configuration")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("In {}", path.display()))
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_exclude_callers<I, S>(mut self, callers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_callers = callers.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = PipelineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.top_n, 5);
        assert_eq!(config.filters[0].op, "notnull");
        assert_eq!(config.keep_year, "(2027)");
    }

    #[test]
    fn test_partial_override() {
        let config = PipelineConfig::from_json_str(
            r#"{
                "strategy": "random_far",
                "projection": "names",
                "top_n": 10,
                "filters": [{ "column": "State", "op": "eq", "value": "OH" }]
            }"#,
        )
        .unwrap();

        assert_eq!(config.strategy, StrategyKind::RandomFar);
        assert_eq!(config.projection, ProjectionMode::Names);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.filters.len(), 1);
        assert_eq!(config.recent_days, 365);
        assert!(config.color_filter);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        assert!(PipelineConfig::from_json_str(r#"{ "strategy": "alphabetical" }"#).is_err());
    }
}
