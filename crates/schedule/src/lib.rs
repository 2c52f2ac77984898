//! Game schedule processing and enrichment.
//!
//! This crate provides:
//! - SchedulePreprocessor: timezone conversion, school split and the
//!   class year filter for exported schedule rows
//! - Recruit list parsing with the greedy comma rejoin
//! - ScheduleEnricher: per-game color tallies joined from the roster
//!
//! ## Example Usage
//! ```ignore
//! use schedule::{ColorLookup, ScheduleEnricher, SchedulePreprocessor};
//!
//! let pre = SchedulePreprocessor::from_timezone_name("America/New_York")?
//!     .with_keep_year("(2027)");
//! let games = pre.games_from_table(&schedule_table);
//!
//! let lookup = ColorLookup::from_roster(&roster, schema.column(LogicalField::ContactSheetColor));
//! let records = ScheduleEnricher::new(lookup).enrich(&games);
//! ```

pub mod enrich;
pub mod error;
pub mod preprocess;
pub mod recruits;
pub mod types;

pub use enrich::{ColorLookup, ScheduleEnricher};
pub use error::{Result, ScheduleError};
pub use preprocess::{DEFAULT_KEEP_YEAR, SchedulePreprocessor, split_schools};
pub use recruits::{filter_by_year, normalize_name, split_recruits, strip_year_tag};
pub use types::{ColorCounts, GameRecord, PROCESSED_COLUMNS, ProcessedGame, RawGame};
