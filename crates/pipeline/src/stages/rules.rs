//! Declarative per-column filter rules.
//!
//! A rule is `(column, op, value)`. Every comparison happens on the
//! trimmed cell and ignores case. A record survives when it satisfies
//! every rule; a rule whose column is missing from the table rejects
//! every record.

use crate::error::PipelineError;
use crate::traits::{RunContext, Stage};
use anyhow::Result;
use data_loader::{Record, RecordSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Comparison applied by a [`FilterRule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    Eq,
    Ne,
    Contains,
    NotNull,
    Null,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Ne => "ne",
            FilterOp::Contains => "contains",
            FilterOp::NotNull => "notnull",
            FilterOp::Null => "null",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOp {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eq" => Ok(FilterOp::Eq),
            "ne" => Ok(FilterOp::Ne),
            "contains" => Ok(FilterOp::Contains),
            "notnull" => Ok(FilterOp::NotNull),
            "null" => Ok(FilterOp::Null),
            other => Err(other.to_string()),
        }
    }
}

/// Rule as written in configuration, before the operator is validated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub column: String,
    pub op: String,
    #[serde(default)]
    pub value: String,
}

/// A validated `(column, op, value)` rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

impl FilterRule {
    pub fn new(column: impl Into<String>, op: FilterOp, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Validate a configured rule. An unknown operator is a configuration error.
    pub fn parse(config: &RuleConfig) -> std::result::Result<Self, PipelineError> {
        if config.column.trim().is_empty() {
            return Err(PipelineError::InvalidConfiguration {
                stage: "RuleFilter".to_string(),
                reason: "filter rule with empty column".to_string(),
            });
        }
        let op = config
            .op
            .parse::<FilterOp>()
            .map_err(|op| PipelineError::UnsupportedOperator {
                column: config.column.clone(),
                op,
            })?;
        Ok(Self::new(config.column.trim(), op, config.value.clone()))
    }

    /// Validate a whole rule list, failing on the first bad rule
    pub fn parse_all(configs: &[RuleConfig]) -> std::result::Result<Vec<Self>, PipelineError> {
        configs.iter().map(Self::parse).collect()
    }

    /// Does the record's cell satisfy this rule?
    pub fn matches(&self, record: &Record) -> bool {
        let cell = record.value(&self.column).trim().to_lowercase();
        let value = self.value.to_lowercase();
        match self.op {
            FilterOp::Eq => cell == value,
            FilterOp::Ne => cell != value,
            FilterOp::Contains => cell.contains(&value),
            FilterOp::NotNull => !cell.is_empty(),
            FilterOp::Null => cell.is_empty(),
        }
    }
}

/// Keep the records satisfying every rule.
///
/// An empty rule list returns the input unchanged.
pub fn apply_rules(records: RecordSet, rules: &[FilterRule]) -> RecordSet {
    if rules.is_empty() {
        return records;
    }

    if let Some(missing) = rules.iter().find(|r| !records.has_column(&r.column)) {
        warn!(
            "filter column '{}' not present, rule {} rejects all {} records",
            missing.column,
            missing.op,
            records.len()
        );
        return records.retain(|_| false);
    }

    records.retain(|record| rules.iter().all(|rule| rule.matches(record)))
}

/// Stage wrapper around [`apply_rules`]
pub struct RuleFilter {
    rules: Vec<FilterRule>,
}

impl RuleFilter {
    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }
}

impl Stage for RuleFilter {
    fn name(&self) -> &str {
        "RuleFilter"
    }

    fn apply(&self, records: RecordSet, _context: &RunContext) -> Result<RecordSet> {
        Ok(apply_rules(records, &self.rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> RecordSet {
        let mut set = RecordSet::new(vec!["Name".into(), "Phone".into(), "State".into()]);
        set.push(Record::from_pairs([("Name", "Ann"), ("Phone", "555"), ("State", "Ohio")]));
        set.push(Record::from_pairs([("Name", "Bo"), ("Phone", "   "), ("State", "ohio ")]));
        set.push(Record::from_pairs([("Name", "Cy"), ("Phone", "777"), ("State", "Texas")]));
        set
    }

    fn names(set: &RecordSet) -> Vec<&str> {
        set.iter().map(|r| r.value("Name")).collect()
    }

    #[test]
    fn test_empty_rules_is_identity() {
        assert_eq!(apply_rules(roster(), &[]), roster());
    }

    #[test]
    fn test_notnull_and_null_use_trimmed_length() {
        let kept = apply_rules(roster(), &[FilterRule::new("Phone", FilterOp::NotNull, "")]);
        assert_eq!(names(&kept), vec!["Ann", "Cy"]);

        let blank = apply_rules(roster(), &[FilterRule::new("phone", FilterOp::Null, "")]);
        assert_eq!(names(&blank), vec!["Bo"]);
    }

    #[test]
    fn test_eq_ne_contains_ignore_case() {
        let eq = apply_rules(roster(), &[FilterRule::new("State", FilterOp::Eq, "OHIO")]);
        assert_eq!(names(&eq), vec!["Ann", "Bo"]);

        let ne = apply_rules(roster(), &[FilterRule::new("State", FilterOp::Ne, "ohio")]);
        assert_eq!(names(&ne), vec!["Cy"]);

        let contains = apply_rules(roster(), &[FilterRule::new("State", FilterOp::Contains, "EX")]);
        assert_eq!(names(&contains), vec!["Cy"]);
    }

    #[test]
    fn test_rules_are_conjunctive() {
        let rules = [
            FilterRule::new("State", FilterOp::Eq, "ohio"),
            FilterRule::new("Phone", FilterOp::NotNull, ""),
        ];
        assert_eq!(names(&apply_rules(roster(), &rules)), vec!["Ann"]);
    }

    #[test]
    fn test_missing_column_rejects_everything() {
        let kept = apply_rules(roster(), &[FilterRule::new("Email", FilterOp::Null, "")]);
        assert!(kept.is_empty());
        assert_eq!(kept.columns(), roster().columns());
    }

    #[test]
    fn test_unknown_operator_is_configuration_error() {
        let config = RuleConfig {
            column: "Phone".into(),
            op: "startswith".into(),
            value: String::new(),
        };
        let err = FilterRule::parse(&config).unwrap_err();
        assert_eq!(
            err,
            PipelineError::UnsupportedOperator {
                column: "Phone".into(),
                op: "startswith".into()
            }
        );
    }

    #[test]
    fn test_operator_names_are_case_insensitive() {
        let config = RuleConfig {
            column: "Phone".into(),
            op: "NotNull".into(),
            value: String::new(),
        };
        assert_eq!(FilterRule::parse(&config).unwrap().op, FilterOp::NotNull);
    }
}
