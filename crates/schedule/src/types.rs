//! Schedule row shapes, before and after processing

use crate::recruits::split_recruits;
use data_loader::{ContactColor, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Headers of the processed schedule table, in output order
pub const PROCESSED_COLUMNS: [&str; 5] = ["Date", "Original_Timezone", "School_1", "School_2", "Recruits"];

// Older processed files used these names for the date and recruit columns
const DATE_ALIASES: &[&str] = &["Date", "Date_NY"];
const RECRUIT_ALIASES: &[&str] = &["Recruits", "Recruits_2027"];

fn first_of<'a>(record: &'a Record, names: &[&str]) -> &'a str {
    names.iter().find_map(|name| record.get(name)).unwrap_or("")
}

/// One row of the schedule as exported
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGame {
    pub date: String,
    pub time: String,
    pub timezone: String,
    /// `"School A vs School B"`
    pub name: String,
    pub recruits: String,
}

impl RawGame {
    pub fn from_record(record: &Record) -> Self {
        Self {
            date: record.value("Date").trim().to_string(),
            time: record.value("Time").trim().to_string(),
            timezone: record.value("Timezone").trim().to_string(),
            name: record.value("Name").trim().to_string(),
            recruits: record.value("Recruits").to_string(),
        }
    }

    /// Is this table an export rather than a processed file?
    pub fn is_raw_table(columns: &[String]) -> bool {
        ["Time", "Timezone", "Name"]
            .iter()
            .all(|needed| columns.iter().any(|c| c.eq_ignore_ascii_case(needed)))
    }
}

/// A schedule row after timezone conversion, school split and year filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedGame {
    /// Converted date/time text, or the raw text when conversion failed
    pub date: String,
    pub original_timezone: String,
    pub school_1: String,
    pub school_2: String,
    pub recruits: Vec<String>,
}

impl ProcessedGame {
    /// Read a row of a processed table, re-splitting the recruit list
    pub fn from_record(record: &Record) -> Self {
        Self {
            date: first_of(record, DATE_ALIASES).trim().to_string(),
            original_timezone: record.value("Original_Timezone").trim().to_string(),
            school_1: record.value("School_1").trim().to_string(),
            school_2: record.value("School_2").trim().to_string(),
            recruits: split_recruits(first_of(record, RECRUIT_ALIASES)),
        }
    }

    pub fn recruits_joined(&self) -> String {
        self.recruits.join(", ")
    }

    /// Cells in [`PROCESSED_COLUMNS`] order
    pub fn to_row(&self) -> [String; 5] {
        [
            self.date.clone(),
            self.original_timezone.clone(),
            self.school_1.clone(),
            self.school_2.clone(),
            self.recruits_joined(),
        ]
    }
}

/// Matched recruits per contact sheet color.
///
/// Always carries all three colors so consumers see explicit zeros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorCounts(BTreeMap<ContactColor, u32>);

impl ColorCounts {
    pub fn new() -> Self {
        Self(ContactColor::ALL.iter().map(|color| (*color, 0)).collect())
    }

    pub fn increment(&mut self, color: ContactColor) {
        *self.0.entry(color).or_insert(0) += 1;
    }

    pub fn get(&self, color: ContactColor) -> u32 {
        self.0.get(&color).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContactColor, u32)> + '_ {
        self.0.iter().map(|(color, count)| (*color, *count))
    }
}

impl Default for ColorCounts {
    fn default() -> Self {
        Self::new()
    }
}

/// A game with the tracked recruits attending it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: String,
    pub school_1: String,
    pub school_2: String,
    /// Matched entries exactly as they appeared in the schedule
    pub recruits: Vec<String>,
    pub color_counts: ColorCounts,
    pub total_tracked: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processed_game_reads_legacy_headers() {
        let record = Record::from_pairs([
            ("Date_NY", "02/14/25 08:00 PM EST"),
            ("Original_Timezone", "America/Chicago"),
            ("School_1", "North"),
            ("School_2", "South"),
            ("Recruits_2027", "Mary, Jane Doe (2027), Ann Lee (2027)"),
        ]);
        let game = ProcessedGame::from_record(&record);

        assert_eq!(game.date, "02/14/25 08:00 PM EST");
        assert_eq!(game.recruits, vec!["Mary, Jane Doe (2027)", "Ann Lee (2027)"]);
        assert_eq!(game.to_row()[4], "Mary, Jane Doe (2027), Ann Lee (2027)");
    }

    #[test]
    fn test_raw_table_detection() {
        let raw: Vec<String> = ["Date", "Time", "Timezone", "Name", "Recruits"].map(String::from).to_vec();
        let processed: Vec<String> = PROCESSED_COLUMNS.map(String::from).to_vec();
        assert!(RawGame::is_raw_table(&raw));
        assert!(!RawGame::is_raw_table(&processed));
    }

    #[test]
    fn test_color_counts_serialize_with_labels() {
        let mut counts = ColorCounts::new();
        counts.increment(ContactColor::ColumbiaBlue);
        counts.increment(ContactColor::ColumbiaBlue);
        counts.increment(ContactColor::Navy);

        assert_eq!(counts.total(), 3);
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "Navy": 1, "Columbia Blue": 2, "Anthracite": 0 })
        );
    }
}
