//! Turns exported schedule rows into [`ProcessedGame`]s.
//!
//! Game times are written in the home team's timezone; everything is
//! converted to one target zone so the page can sort and display them.

use crate::error::{Result, ScheduleError};
use crate::recruits::{filter_by_year, split_recruits};
use crate::types::{ProcessedGame, RawGame};
use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use data_loader::RecordSet;
use tracing::{info, warn};

/// Date and time as the export writes them, e.g. `02/14/25 7:00 PM`
pub const INPUT_FORMAT: &str = "%m/%d/%y %I:%M %p";

/// Converted time, with the target zone abbreviation
pub const OUTPUT_FORMAT: &str = "%m/%d/%y %I:%M %p %Z";

pub const DEFAULT_KEEP_YEAR: &str = "(2027)";

/// Split `"North vs South"` on the first `" vs "`.
///
/// Without the delimiter the whole name is the first school.
pub fn split_schools(name: &str) -> (String, String) {
    match name.split_once(" vs ") {
        Some((first, second)) => (first.trim().to_string(), second.trim().to_string()),
        None => (name.trim().to_string(), String::new()),
    }
}

pub struct SchedulePreprocessor {
    target_tz: Tz,
    keep_year: String,
}

impl SchedulePreprocessor {
    pub fn new(target_tz: Tz) -> Self {
        Self {
            target_tz,
            keep_year: DEFAULT_KEEP_YEAR.to_string(),
        }
    }

    /// Build from an IANA zone name such as `America/New_York`
    pub fn from_timezone_name(name: &str) -> Result<Self> {
        let tz = name.trim().parse::<Tz>().map_err(|_| ScheduleError::UnknownTimezone {
            name: name.to_string(),
        })?;
        Ok(Self::new(tz))
    }

    /// Configure the class year tag to keep (default: `(2027)`)
    pub fn with_keep_year(mut self, tag: impl Into<String>) -> Self {
        self.keep_year = tag.into();
        self
    }

    pub fn target_tz(&self) -> Tz {
        self.target_tz
    }

    pub fn keep_year(&self) -> &str {
        &self.keep_year
    }

    /// Convert a local game time in `timezone` to the target zone.
    ///
    /// Ambiguous local times (DST fall-back) resolve to the earlier instant.
    pub fn convert_time(&self, date: &str, time: &str, timezone: &str) -> Result<String> {
        let value = format!("{} {}", date.trim(), time.trim());
        let naive = NaiveDateTime::parse_from_str(&value, INPUT_FORMAT).map_err(|source| {
            ScheduleError::InvalidTimestamp {
                value: value.clone(),
                source,
            }
        })?;
        let source_tz = timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| ScheduleError::UnknownTimezone {
                name: timezone.to_string(),
            })?;
        let local = source_tz
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| ScheduleError::NonexistentLocalTime {
                value: value.clone(),
                timezone: timezone.to_string(),
            })?;

        Ok(local.with_timezone(&self.target_tz).format(OUTPUT_FORMAT).to_string())
    }

    /// Process one exported row. A time that cannot be converted keeps its
    /// raw `date time` text.
    pub fn process(&self, raw: &RawGame) -> ProcessedGame {
        let date = match self.convert_time(&raw.date, &raw.time, &raw.timezone) {
            Ok(converted) => converted,
            Err(e) => {
                warn!("keeping raw game time for '{}': {}", raw.name, e);
                format!("{} {}", raw.date, raw.time).trim().to_string()
            }
        };
        let (school_1, school_2) = split_schools(&raw.name);

        ProcessedGame {
            date,
            original_timezone: raw.timezone.clone(),
            school_1,
            school_2,
            recruits: filter_by_year(split_recruits(&raw.recruits), &self.keep_year),
        }
    }

    /// Process every row of an exported schedule table
    pub fn process_table(&self, schedule: &RecordSet) -> Vec<ProcessedGame> {
        let games: Vec<ProcessedGame> = schedule
            .iter()
            .map(|record| self.process(&RawGame::from_record(record)))
            .collect();

        let max_recruits = games.iter().map(|g| g.recruits.len()).max().unwrap_or(0);
        info!(
            "processed {} games into {} (max {} recruits ending with {})",
            games.len(),
            self.target_tz,
            max_recruits,
            self.keep_year
        );
        games
    }

    /// Games from either an exported or an already processed table
    pub fn games_from_table(&self, schedule: &RecordSet) -> Vec<ProcessedGame> {
        if RawGame::is_raw_table(schedule.columns()) {
            self.process_table(schedule)
        } else {
            info!("schedule is already processed, re-reading {} games", schedule.len());
            schedule.iter().map(ProcessedGame::from_record).collect()
        }
    }
}

impl Default for SchedulePreprocessor {
    fn default() -> Self {
        Self::new(chrono_tz::America::New_York)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, time: &str, timezone: &str, name: &str, recruits: &str) -> RawGame {
        RawGame {
            date: date.into(),
            time: time.into(),
            timezone: timezone.into(),
            name: name.into(),
            recruits: recruits.into(),
        }
    }

    #[test]
    fn test_convert_time_to_new_york() {
        let pre = SchedulePreprocessor::default();
        assert_eq!(
            pre.convert_time("02/14/25", "7:00 PM", "America/Chicago").unwrap(),
            "02/14/25 08:00 PM EST"
        );
        assert_eq!(
            pre.convert_time("07/04/25", "6:30 PM", "America/Los_Angeles").unwrap(),
            "07/04/25 09:30 PM EDT"
        );
        // crossing midnight moves the date too
        assert_eq!(
            pre.convert_time("03/01/25", "10:30 PM", "America/Denver").unwrap(),
            "03/02/25 12:30 AM EST"
        );
    }

    #[test]
    fn test_convert_time_errors() {
        let pre = SchedulePreprocessor::default();
        assert!(matches!(
            pre.convert_time("Feb 14", "7 PM", "America/Chicago"),
            Err(ScheduleError::InvalidTimestamp { .. })
        ));
        assert!(matches!(
            pre.convert_time("02/14/25", "7:00 PM", "Mars/Olympus"),
            Err(ScheduleError::UnknownTimezone { .. })
        ));
        // 2:30 AM does not exist on the spring-forward day
        assert!(matches!(
            pre.convert_time("03/09/25", "2:30 AM", "America/New_York"),
            Err(ScheduleError::NonexistentLocalTime { .. })
        ));
    }

    #[test]
    fn test_split_schools() {
        assert_eq!(split_schools("North vs South"), ("North".into(), "South".into()));
        assert_eq!(split_schools("A vs B vs C"), ("A".into(), "B vs C".into()));
        assert_eq!(split_schools("Showcase"), ("Showcase".into(), String::new()));
    }

    #[test]
    fn test_process_row() {
        let pre = SchedulePreprocessor::default();
        let game = pre.process(&raw(
            "02/14/25",
            "7:00 PM",
            "America/Chicago",
            "North vs South",
            "John A. Smith (2027), Mary, Jane Doe (2026), Ann Lee (2027)",
        ));

        assert_eq!(game.date, "02/14/25 08:00 PM EST");
        assert_eq!(game.original_timezone, "America/Chicago");
        assert_eq!(game.school_1, "North");
        assert_eq!(game.school_2, "South");
        assert_eq!(game.recruits, vec!["John A. Smith (2027)", "Ann Lee (2027)"]);
    }

    #[test]
    fn test_bad_time_keeps_raw_text() {
        let pre = SchedulePreprocessor::default().with_keep_year("(2026)");
        let game = pre.process(&raw("TBD", "", "America/Chicago", "Classic", "Bo Park (2026)"));
        assert_eq!(game.date, "TBD");
        assert_eq!(game.recruits, vec!["Bo Park (2026)"]);
    }

    #[test]
    fn test_unknown_target_timezone() {
        assert!(SchedulePreprocessor::from_timezone_name("Nowhere/Special").is_err());
        let pre = SchedulePreprocessor::from_timezone_name("America/Chicago").unwrap();
        assert_eq!(pre.target_tz(), chrono_tz::America::Chicago);
    }
}
