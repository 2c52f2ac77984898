//! Keeps the contact sheet worked this month.

use crate::traits::{RunContext, Stage};
use anyhow::Result;
use data_loader::{ContactColor, RecordSet};
use tracing::{info, warn};

/// Removes records whose contact sheet color is not the color of the
/// month containing `context.now`.
///
/// When the export has no color column the filter cannot decide, so it
/// logs a warning and passes everything through.
pub struct ContactColorFilter {
    column: Option<String>,
}

impl ContactColorFilter {
    /// # Arguments
    /// * `column` - Resolved contact sheet color header, if any
    pub fn new(column: Option<&str>) -> Self {
        Self {
            column: column.map(str::to_string),
        }
    }
}

impl Stage for ContactColorFilter {
    fn name(&self) -> &str {
        "ContactColorFilter"
    }

    fn apply(&self, records: RecordSet, context: &RunContext) -> Result<RecordSet> {
        let Some(column) = self.column.as_deref() else {
            warn!("no contact sheet color column, keeping all {} records", records.len());
            return Ok(records);
        };

        let keep = ContactColor::for_date(&context.now);
        let before = records.len();
        let kept = records.retain(|record| keep.matches(record.value(column)));
        info!(
            "kept {}/{} rows where '{}' == '{}'",
            kept.len(),
            before,
            column,
            keep
        );
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use data_loader::Record;

    fn roster() -> RecordSet {
        let mut set = RecordSet::new(vec!["Name".into(), "Contact Sheet Color".into()]);
        for (name, color) in [("Ann", "Navy"), ("Bo", " columbia blue "), ("Cy", "Anthracite"), ("Di", "")] {
            set.push(Record::from_pairs([("Name", name), ("Contact Sheet Color", color)]));
        }
        set
    }

    fn context(month: u32) -> RunContext {
        RunContext::new(Utc.with_ymd_and_hms(2025, month, 15, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_keeps_month_color_only() {
        let filter = ContactColorFilter::new(Some("Contact Sheet Color"));

        let august = filter.apply(roster(), &context(8)).unwrap();
        let names: Vec<_> = august.iter().map(|r| r.value("Name")).collect();
        assert_eq!(names, vec!["Bo"]);

        let april = filter.apply(roster(), &context(4)).unwrap();
        assert_eq!(april.records()[0].value("Name"), "Ann");
        assert_eq!(april.len(), 1);
    }

    #[test]
    fn test_missing_column_passes_through() {
        let filter = ContactColorFilter::new(None);
        let result = filter.apply(roster(), &context(1)).unwrap();
        assert_eq!(result.len(), 4);
    }
}
