//! Strategy selector and shared helpers

use chrono::{DateTime, Utc};
use data_loader::{DistanceBucket, Record, distance_column, instant_column};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which ranking strategy a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Chronological,
    BucketPriority,
    RandomFar,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Chronological,
        StrategyKind::BucketPriority,
        StrategyKind::RandomFar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Chronological => "chronological",
            StrategyKind::BucketPriority => "bucket_priority",
            StrategyKind::RandomFar => "random_far",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "chronological" => Ok(StrategyKind::Chronological),
            "bucket_priority" | "bucket" => Ok(StrategyKind::BucketPriority),
            "random_far" | "random" => Ok(StrategyKind::RandomFar),
            other => Err(format!("unknown ranking strategy: {other}")),
        }
    }
}

/// Bucket of a record for `prefix`.
///
/// Uses the typed mark when the record went through classification in this
/// process, otherwise reads the `<prefix>_distance` column. Anything else is
/// `never`.
pub fn bucket_of(record: &Record, prefix: &str) -> DistanceBucket {
    if let Some(mark) = record.recency(prefix) {
        return mark.bucket;
    }
    match record.value(&distance_column(prefix)).trim() {
        "recent" => DistanceBucket::Recent,
        "far" => DistanceBucket::Far,
        _ => DistanceBucket::Never,
    }
}

/// Contact instant of a record for `prefix`, from the typed mark or the
/// RFC 3339 `<prefix>_dt` column
pub fn instant_of(record: &Record, prefix: &str) -> Option<DateTime<Utc>> {
    if let Some(mark) = record.recency(prefix) {
        return mark.instant;
    }
    DateTime::parse_from_rfc3339(record.value(&instant_column(prefix)).trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whole days since the contact for `prefix`, when known
pub fn days_since(record: &Record, prefix: &str) -> Option<i64> {
    record.recency(prefix).and_then(|mark| mark.days_since)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::RecencyMark;

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!("bucket-priority".parse::<StrategyKind>(), Ok(StrategyKind::BucketPriority));
        assert_eq!("Random_Far".parse::<StrategyKind>(), Ok(StrategyKind::RandomFar));
        assert!("alphabetical".parse::<StrategyKind>().is_err());

        for kind in StrategyKind::ALL {
            assert_eq!(kind.as_str().parse::<StrategyKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_bucket_of_prefers_typed_mark() {
        let mut record = Record::from_pairs([("called_distance", "far")]);
        assert_eq!(bucket_of(&record, "called"), DistanceBucket::Far);

        record.set_recency("called", RecencyMark::never());
        assert_eq!(bucket_of(&record, "called"), DistanceBucket::Never);
        assert_eq!(bucket_of(&record, "texted"), DistanceBucket::Never);
    }
}
