//! Errors raised while converting schedule rows

use thiserror::Error;

/// Problems with one schedule row.
///
/// None of these abort a batch: the preprocessor logs them and keeps the
/// row with its raw date text.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid game time '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Unknown timezone '{name}'")]
    UnknownTimezone { name: String },

    /// The local time falls in a DST gap of its timezone
    #[error("'{value}' does not exist in {timezone}")]
    NonexistentLocalTime { value: String, timezone: String },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
