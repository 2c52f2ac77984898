//! Core domain types for roster and schedule tables.
//!
//! A table is a [`RecordSet`]: an ordered list of column names plus the
//! [`Record`]s read under them. Every value is a trimmed string and the
//! empty string means "absent". Column lookups are case-insensitive but
//! the exported spelling of each header is preserved for output.

use chrono::{DateTime, Datelike, Month, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Derived column names
// =============================================================================

/// Written by the name consolidation stage from first/last name columns.
pub const FULL_NAME: &str = "Full Name";
pub const MOTHER_FULL_NAME: &str = "Mother's Full Name";
pub const FATHER_FULL_NAME: &str = "Father's Full Name";

/// Column holding the parsed instant for a recency prefix, e.g. `called_dt`.
pub fn instant_column(prefix: &str) -> String {
    format!("{prefix}_dt")
}

/// Column holding the bucket label for a recency prefix, e.g. `called_distance`.
pub fn distance_column(prefix: &str) -> String {
    format!("{prefix}_distance")
}

// =============================================================================
// Record
// =============================================================================

/// One row of a table.
///
/// Fields keep insertion order so a record can be written back out in the
/// same column order it was read. Recency classification additionally
/// attaches a typed [`RecencyMark`] per prefix, which the ranking
/// strategies read instead of re-parsing the string columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, String)>,
    recency: BTreeMap<String, RecencyMark>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(column, value)` pairs. Later duplicates overwrite earlier ones.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (key, value) in pairs {
            record.set(key, value);
        }
        record
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.fields
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive field lookup
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.fields[idx].1.as_str())
    }

    /// Field value, or the empty string when the column is absent
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Set a field, replacing an existing value under any casing of the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.fields[idx].1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Remove a field, returning its value if it was present
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|idx| self.fields.remove(idx).1)
    }

    /// Iterate `(column, value)` pairs in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Typed recency classification for a prefix such as `called`
    pub fn recency(&self, prefix: &str) -> Option<&RecencyMark> {
        self.recency.get(prefix)
    }

    pub fn set_recency(&mut self, prefix: impl Into<String>, mark: RecencyMark) {
        self.recency.insert(prefix.into(), mark);
    }
}

// =============================================================================
// RecordSet
// =============================================================================

/// An ordered table: column names plus the records read under them.
///
/// Stages take a `RecordSet` by value and hand back a new one, so no
/// stage ever observes another stage's intermediate state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    pub fn with_records(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Resolve a column name case-insensitively, returning the stored spelling
    pub fn resolve_column(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.columns
            .iter()
            .find(|c| c.eq_ignore_ascii_case(name))
            .map(|c| c.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.resolve_column(name).is_some()
    }

    /// Append a column if no column of that name (in any casing) exists yet
    pub fn add_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_column(&name) {
            self.columns.push(name);
        }
    }

    /// Remove a column from the header and from every record.
    ///
    /// Returns `false` when the column was not present.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name.trim()))
        else {
            return false;
        };
        let removed = self.columns.remove(idx);
        for record in &mut self.records {
            record.remove(&removed);
        }
        true
    }

    /// Keep only the records matching `predicate`, preserving order
    pub fn retain(mut self, mut predicate: impl FnMut(&Record) -> bool) -> Self {
        self.records.retain(|r| predicate(r));
        self
    }

    /// Values of a record in this set's column order (absent → empty)
    pub fn row_values<'a>(&self, record: &'a Record) -> Vec<&'a str> {
        self.columns.iter().map(|c| record.value(c)).collect()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// =============================================================================
// Recency
// =============================================================================

/// How long ago a contact happened, relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceBucket {
    /// No timestamp, or one that could not be parsed
    Never,
    /// Older than the recency cutoff
    Far,
    /// On or after the cutoff
    Recent,
}

impl DistanceBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceBucket::Never => "never",
            DistanceBucket::Far => "far",
            DistanceBucket::Recent => "recent",
        }
    }
}

impl fmt::Display for DistanceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed result of classifying one timestamp column of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyMark {
    pub instant: Option<DateTime<Utc>>,
    /// Whole days between the contact day and the reference day
    pub days_since: Option<i64>,
    pub bucket: DistanceBucket,
}

impl RecencyMark {
    pub fn never() -> Self {
        Self {
            instant: None,
            days_since: None,
            bucket: DistanceBucket::Never,
        }
    }
}

// =============================================================================
// Contact sheet color
// =============================================================================

/// Contact sheet color tag. Each month of the year has exactly one color,
/// cycling Navy → Columbia Blue → Anthracite twice a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContactColor {
    Navy,
    #[serde(rename = "Columbia Blue")]
    ColumbiaBlue,
    Anthracite,
}

impl ContactColor {
    pub const ALL: [ContactColor; 3] = [
        ContactColor::Navy,
        ContactColor::ColumbiaBlue,
        ContactColor::Anthracite,
    ];

    /// The color whose contact sheet is worked during `month`
    pub fn for_month(month: Month) -> Self {
        Self::for_month_number(month.number_from_month())
    }

    /// The color for the month containing `now`
    pub fn for_date(now: &impl Datelike) -> Self {
        Self::for_month_number(now.month())
    }

    /// `month` counts from 1 for January
    fn for_month_number(month: u32) -> Self {
        match month % 3 {
            1 => ContactColor::Navy,
            2 => ContactColor::ColumbiaBlue,
            _ => ContactColor::Anthracite,
        }
    }

    /// Label as it appears in roster exports
    pub fn label(&self) -> &'static str {
        match self {
            ContactColor::Navy => "Navy",
            ContactColor::ColumbiaBlue => "Columbia Blue",
            ContactColor::Anthracite => "Anthracite",
        }
    }

    /// Case-insensitive match against a roster cell
    pub fn matches(&self, cell: &str) -> bool {
        cell.trim().eq_ignore_ascii_case(self.label())
    }
}

impl fmt::Display for ContactColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContactColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContactColor::ALL
            .into_iter()
            .find(|c| c.matches(s))
            .ok_or_else(|| format!("unknown contact sheet color: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_lookup_is_case_insensitive() {
        let record = Record::from_pairs([("Mobile Phone", "555-0100")]);
        assert_eq!(record.get("mobile phone"), Some("555-0100"));
        assert_eq!(record.get(" MOBILE PHONE "), Some("555-0100"));
        assert_eq!(record.value("Email"), "");
    }

    #[test]
    fn test_record_set_overwrites_existing_casing() {
        let mut record = Record::from_pairs([("State", "OH")]);
        record.set("state", "PA");
        assert_eq!(record.len(), 1);
        let fields: Vec<_> = record.fields().collect();
        assert_eq!(fields, vec![("State", "PA")]);
    }

    #[test]
    fn test_drop_column_removes_from_records() {
        let mut set = RecordSet::new(vec!["A".into(), "B".into()]);
        set.push(Record::from_pairs([("A", "1"), ("B", "2")]));

        assert!(set.drop_column("b"));
        assert!(!set.drop_column("b"));
        assert_eq!(set.columns(), &["A".to_string()]);
        assert_eq!(set.records()[0].get("B"), None);
    }

    #[test]
    fn test_row_values_follow_column_order() {
        let mut set = RecordSet::new(vec!["B".into(), "A".into(), "C".into()]);
        set.push(Record::from_pairs([("A", "1"), ("B", "2")]));
        assert_eq!(set.row_values(&set.records()[0]), vec!["2", "1", ""]);
    }

    #[test]
    fn test_color_cycle() {
        assert_eq!(ContactColor::for_month(Month::January), ContactColor::Navy);
        assert_eq!(ContactColor::for_month(Month::July), ContactColor::Navy);
        assert_eq!(ContactColor::for_month(Month::February), ContactColor::ColumbiaBlue);
        assert_eq!(ContactColor::for_month(Month::September), ContactColor::Anthracite);
        assert_eq!(ContactColor::for_month(Month::December), ContactColor::Anthracite);
    }

    #[test]
    fn test_each_color_covers_four_months() {
        for color in ContactColor::ALL {
            let months = (1u8..=12)
                .filter_map(|m| Month::try_from(m).ok())
                .filter(|m| ContactColor::for_month(*m) == color)
                .count();
            assert_eq!(months, 4, "{color} should own four months");
        }
    }

    #[test]
    fn test_for_date_agrees_with_for_month() {
        for number in 1u32..=12 {
            let first = Utc.with_ymd_and_hms(2025, number, 1, 0, 0, 0).unwrap();
            let month = Month::try_from(number as u8).unwrap();
            assert_eq!(ContactColor::for_date(&first), ContactColor::for_month(month), "{month:?}");
        }
        let december = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(ContactColor::for_date(&december), ContactColor::Anthracite);
    }

    #[test]
    fn test_color_for_date_and_parse() {
        let now = Utc.with_ymd_and_hms(2025, 10, 3, 12, 0, 0).unwrap();
        assert_eq!(ContactColor::for_date(&now), ContactColor::Navy);
        assert_eq!("columbia blue".parse::<ContactColor>(), Ok(ContactColor::ColumbiaBlue));
        assert!("Teal".parse::<ContactColor>().is_err());
    }
}
