//! Recency classification of contact timestamps.
//!
//! Each record is put in one of three buckets by how long ago a contact
//! happened, relative to the start of the reference day in UTC:
//!
//! - `never`: the cell is empty or could not be parsed
//! - `recent`: on or after `today - recent_days` (the cutoff itself counts)
//! - `far`: anything older
//!
//! The stage writes two string columns (`<prefix>_dt`, `<prefix>_distance`)
//! for output and attaches a typed [`RecencyMark`] for ranking.

use crate::error::PipelineError;
use crate::traits::{RunContext, Stage};
use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use data_loader::{DistanceBucket, RecencyMark, RecordSet, distance_column, instant_column};
use tracing::{debug, warn};

/// Default window for `recent`
pub const DEFAULT_RECENT_DAYS: u32 = 365;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    // two-digit years first: %Y would happily read "24" as year 24
    "%m/%d/%y %H:%M",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d", "%b %d, %Y", "%B %d, %Y"];

/// Parse a contact timestamp the way spreadsheet exports write them.
///
/// Values with an offset are converted to UTC; values without one are
/// taken to be UTC already. Returns `None` for empty or unrecognised text.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date.and_time(NaiveTime::MIN).and_utc());
        }
    }
    None
}

/// Largest `recent_days` a run accepts: one hundred years
pub const MAX_RECENT_DAYS: u32 = 36_500;

/// Start of the reference day minus `recent_days`.
///
/// A window reaching past the earliest representable date clamps to it,
/// so every dated contact is then `recent`.
pub fn cutoff(now: DateTime<Utc>, recent_days: u32) -> DateTime<Utc> {
    let today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    Duration::try_days(i64::from(recent_days))
        .and_then(|window| today.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Reject a `recent` window no roster could meaningfully use
pub fn validate_recent_days(recent_days: u32) -> std::result::Result<(), PipelineError> {
    if recent_days > MAX_RECENT_DAYS {
        return Err(PipelineError::InvalidConfiguration {
            stage: "RecencyClassifier".to_string(),
            reason: format!("recent_days {recent_days} exceeds the limit of {MAX_RECENT_DAYS}"),
        });
    }
    Ok(())
}

/// Classify one cell
pub fn classify_value(raw: &str, now: DateTime<Utc>, recent_days: u32) -> RecencyMark {
    let Some(instant) = parse_timestamp(raw) else {
        if !raw.trim().is_empty() {
            debug!("unparseable timestamp '{}', treating as never", raw.trim());
        }
        return RecencyMark::never();
    };

    let bucket = if instant >= cutoff(now, recent_days) {
        DistanceBucket::Recent
    } else {
        DistanceBucket::Far
    };
    RecencyMark {
        instant: Some(instant),
        days_since: Some((now.date_naive() - instant.date_naive()).num_days()),
        bucket,
    }
}

/// Classify every record by the timestamp in `field`.
///
/// When `field` is `None` or not a column of `records`, every record is
/// marked `never`.
pub fn classify(
    records: RecordSet,
    field: Option<&str>,
    prefix: &str,
    recent_days: u32,
    now: DateTime<Utc>,
) -> RecordSet {
    let mut set = records;
    let column = field.and_then(|f| set.resolve_column(f)).map(str::to_string);
    if column.is_none() {
        warn!(
            "no '{}' timestamp column found, treating all {} records as never",
            prefix,
            set.len()
        );
    }

    let dt_column = instant_column(prefix);
    let distance = distance_column(prefix);
    set.add_column(dt_column.clone());
    set.add_column(distance.clone());

    for record in set.records_mut() {
        let mark = match &column {
            Some(column) => classify_value(record.value(column), now, recent_days),
            None => RecencyMark::never(),
        };
        let instant_text = mark.instant.map(|dt| dt.to_rfc3339()).unwrap_or_default();
        record.set(dt_column.clone(), instant_text);
        record.set(distance.clone(), mark.bucket.as_str());
        record.set_recency(prefix, mark);
    }
    set
}

/// Stage wrapper around [`classify`]
pub struct RecencyClassifier {
    column: Option<String>,
    prefix: String,
    recent_days: u32,
}

impl RecencyClassifier {
    /// # Arguments
    /// * `column` - Resolved timestamp header, if the export has one
    /// * `prefix` - Prefix of the derived columns, e.g. `called`
    /// * `recent_days` - Size of the `recent` window in days
    pub fn new(column: Option<&str>, prefix: impl Into<String>, recent_days: u32) -> Self {
        Self {
            column: column.map(str::to_string),
            prefix: prefix.into(),
            recent_days,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Stage for RecencyClassifier {
    fn name(&self) -> &str {
        "RecencyClassifier"
    }

    fn apply(&self, records: RecordSet, context: &RunContext) -> Result<RecordSet> {
        Ok(classify(
            records,
            self.column.as_deref(),
            &self.prefix,
            self.recent_days,
            context.now,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use data_loader::Record;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 17, 30, 0).unwrap()
    }

    fn roster(values: &[&str]) -> RecordSet {
        let mut set = RecordSet::new(vec!["Name".into(), "Last Called".into()]);
        for (idx, value) in values.iter().enumerate() {
            set.push(Record::from_pairs([("Name", format!("p{idx}")), ("Last Called", value.to_string())]));
        }
        set
    }

    fn buckets(set: &RecordSet) -> Vec<&str> {
        set.iter().map(|r| r.value("called_distance")).collect()
    }

    #[test]
    fn test_parse_common_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-05"), Some(expected));
        assert_eq!(parse_timestamp("01/05/2024"), Some(expected));
        assert_eq!(parse_timestamp("1/5/24"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-05T10:00:00-05:00"),
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 15, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("01/05/2024 3:15 PM"),
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 15, 15, 0).unwrap())
        );
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("last spring"), None);
    }

    #[test]
    fn test_cutoff_boundary_is_inclusive() {
        // Reference day 2025-06-15, 365 days back is 2024-06-15
        let set = classify(
            roster(&["2024-06-15", "2024-06-14", "2024-06-14 23:59:59"]),
            Some("Last Called"),
            "called",
            365,
            now(),
        );
        assert_eq!(buckets(&set), vec!["recent", "far", "far"]);
    }

    #[test]
    fn test_huge_window_clamps_instead_of_overflowing() {
        assert_eq!(cutoff(now(), u32::MAX), DateTime::<Utc>::MIN_UTC);

        let set = classify(roster(&["1901-01-01", ""]), Some("Last Called"), "called", u32::MAX, now());
        assert_eq!(buckets(&set), vec!["recent", "never"]);
    }

    #[test]
    fn test_recent_days_limit() {
        assert!(validate_recent_days(DEFAULT_RECENT_DAYS).is_ok());
        assert!(validate_recent_days(MAX_RECENT_DAYS).is_ok());
        assert!(matches!(
            validate_recent_days(MAX_RECENT_DAYS + 1),
            Err(PipelineError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_missing_and_unparseable_are_never() {
        let set = classify(roster(&["", "n/a", "2025-06-01"]), Some("Last Called"), "called", 365, now());
        assert_eq!(buckets(&set), vec!["never", "never", "recent"]);
        assert_eq!(set.records()[0].value("called_dt"), "");
        assert!(set.records()[2].value("called_dt").starts_with("2025-06-01T00:00:00"));
    }

    #[test]
    fn test_missing_column_marks_all_never() {
        let set = classify(roster(&["2025-06-01"]), None, "called", 365, now());
        assert_eq!(buckets(&set), vec!["never"]);
        assert!(set.has_column("called_dt"));

        let set = classify(roster(&["2025-06-01"]), Some("Last Texted"), "texted", 365, now());
        assert_eq!(set.records()[0].value("texted_distance"), "never");
    }

    #[test]
    fn test_typed_mark_records_days_since() {
        let set = classify(roster(&["2025-06-05"]), Some("last called"), "called", 365, now());
        let mark = set.records()[0].recency("called").unwrap();
        assert_eq!(mark.bucket, DistanceBucket::Recent);
        assert_eq!(mark.days_since, Some(10));
    }

    #[test]
    fn test_stage_uses_context_now() {
        let stage = RecencyClassifier::new(Some("Last Called"), "called", 30);
        let context = RunContext::new(now());
        let set = stage.apply(roster(&["2025-05-16", "2025-05-15"]), &context).unwrap();
        assert_eq!(buckets(&set), vec!["recent", "far"]);
    }
}
