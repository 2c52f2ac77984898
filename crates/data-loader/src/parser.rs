//! Parser for delimited roster and schedule exports.
//!
//! Exports come from spreadsheet tools, so this module is deliberately
//! forgiving about shape:
//! - header names and values are trimmed
//! - short rows are padded with empty strings, extra cells are dropped
//! - blank lines are skipped; a row of empty cells is still a record
//! - no type coercion happens here; every value stays a string

use crate::error::{DataLoadError, Result};
use crate::types::{Record, RecordSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read a file as text.
///
/// Most exports are UTF-8, but older ones are ISO-8859-1 (Latin-1). When
/// the bytes are not valid UTF-8 each byte is mapped directly to the
/// Unicode code point of the same value.
fn read_text(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            debug!("{} is not UTF-8, decoding as Latin-1", path.display());
            Ok(e.into_bytes().iter().map(|&b| b as char).collect())
        }
    }
}

/// Load a comma-delimited table with a header row from disk.
///
/// Fails with [`DataLoadError::InputNotFound`] before reading anything
/// when the path does not exist.
pub fn load_table(path: &Path) -> Result<RecordSet> {
    if !path.exists() {
        return Err(DataLoadError::InputNotFound {
            path: path.display().to_string(),
        });
    }
    let text = read_text(path)?;
    parse_table(&text, &path.display().to_string())
}

/// Parse comma-delimited text with a header row
pub fn parse_table(text: &str, source_name: &str) -> Result<RecordSet> {
    parse_table_with_delimiter(text, b',', source_name)
}

/// Parse delimited text with a header row using an explicit delimiter
pub fn parse_table_with_delimiter(text: &str, delimiter: u8, source_name: &str) -> Result<RecordSet> {
    let csv_error = |source: csv::Error| DataLoadError::CsvError {
        source_name: source_name.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.trim_start_matches('\u{feff}').as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(DataLoadError::MissingHeader {
            source_name: source_name.to_string(),
        });
    }

    let mut set = RecordSet::new(headers.clone());
    for result in reader.records() {
        let row = result.map_err(csv_error)?;
        let record = Record::from_pairs(
            headers
                .iter()
                .enumerate()
                .map(|(idx, header)| (header.clone(), row.get(idx).unwrap_or("").trim().to_string())),
        );
        set.push(record);
    }

    debug!(
        "Parsed {} rows x {} columns from {}",
        set.len(),
        set.columns().len(),
        source_name
    );
    Ok(set)
}
