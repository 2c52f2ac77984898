//! # Data Loader Crate
//!
//! This crate loads roster and schedule exports into typed tables.
//!
//! ## Main Components
//!
//! - **types**: Core table types (Record, RecordSet) and the small value
//!   types shared by every stage (ContactColor, DistanceBucket, RecencyMark)
//! - **schema**: Header alias table resolving logical fields to actual headers
//! - **parser**: Parse delimited text into a RecordSet
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{load_table, RosterSchema, LogicalField};
//! use std::path::Path;
//!
//! let roster = load_table(Path::new("data/export.csv"))?;
//! let schema = RosterSchema::resolve(roster.columns());
//!
//! if let Some(col) = schema.column(LogicalField::LastCalled) {
//!     println!("contact dates come from '{}'", col);
//! }
//! ```

// Public modules
pub mod error;
pub mod parser;
pub mod schema;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use parser::{load_table, parse_table, parse_table_with_delimiter};
pub use schema::{ColumnMatcher, LogicalField, RosterSchema};
pub use types::{
    // Derived column names
    FATHER_FULL_NAME,
    FULL_NAME,
    MOTHER_FULL_NAME,
    distance_column,
    instant_column,
    // Core types
    Record,
    RecordSet,
    RecencyMark,
    // Enums
    ContactColor,
    DistanceBucket,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_set_creation() {
        // An empty table still knows its columns
        let set = RecordSet::new(vec!["Full Name".to_string()]);

        assert!(set.is_empty());
        assert!(set.has_column("full name"));
    }

    #[test]
    fn test_loaded_table_resolves_schema() {
        let text = "First Name,Last Name,Mobile Phone,Last Called,Last Call With\n\
                    Ann,Lee,555-0100,2024-01-05,coach a\n";
        let set = parse_table(text, "export.csv").unwrap();
        let schema = RosterSchema::resolve(set.columns());

        assert_eq!(schema.column(LogicalField::MobilePhone), Some("Mobile Phone"));
        assert_eq!(schema.column(LogicalField::LastCalled), Some("Last Called"));
        assert_eq!(set.records()[0].value("Last Call With"), "coach a");
    }
}
