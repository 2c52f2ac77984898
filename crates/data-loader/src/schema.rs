//! Header alias table for roster exports.
//!
//! Roster exports rename and reorder columns between pulls. Rather than
//! searching headers ad hoc at every use site, each logical field has one
//! [`ColumnMatcher`] and the whole table is resolved once at load time
//! into a [`RosterSchema`].
//!
//! Resolution rules, applied to trimmed, lowercased headers in file order
//! (the first matching header wins):
//!
//! | Field | Rule |
//! |---|---|
//! | `LastCalled` | contains `call` and `last`, does not contain `with` |
//! | `LastCallWith` | contains `call` and `with` |
//! | `LastTexted` | contains `text` and `last` |
//! | `ContactSheetColor` | contains `contact sheet color` |
//! | everything else | equals the canonical header, ignoring case |

use std::collections::HashMap;

/// Fields the pipeline reads from a roster export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    MobilePhone,
    BoardPosition,
    State,
    ContactSheetColor,
    HasTranscript,
    LastEvaluation,
    LastCalled,
    LastCallWith,
    LastTexted,
    MotherPhone,
    MotherEmail,
    FatherPhone,
    FatherEmail,
    HsName,
    HsPhone,
}

/// How a logical field is recognised in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMatcher {
    /// Case-insensitive equality with one canonical header
    Exact(&'static str),
    /// Every `all` substring present, no `none` substring present
    Contains {
        all: &'static [&'static str],
        none: &'static [&'static str],
    },
}

impl ColumnMatcher {
    pub fn matches(&self, header: &str) -> bool {
        let header = header.trim().to_lowercase();
        match self {
            ColumnMatcher::Exact(name) => header == name.to_lowercase(),
            ColumnMatcher::Contains { all, none } => {
                all.iter().all(|s| header.contains(s)) && !none.iter().any(|s| header.contains(s))
            }
        }
    }
}

impl LogicalField {
    pub const ALL: [LogicalField; 15] = [
        LogicalField::MobilePhone,
        LogicalField::BoardPosition,
        LogicalField::State,
        LogicalField::ContactSheetColor,
        LogicalField::HasTranscript,
        LogicalField::LastEvaluation,
        LogicalField::LastCalled,
        LogicalField::LastCallWith,
        LogicalField::LastTexted,
        LogicalField::MotherPhone,
        LogicalField::MotherEmail,
        LogicalField::FatherPhone,
        LogicalField::FatherEmail,
        LogicalField::HsName,
        LogicalField::HsPhone,
    ];

    pub fn matcher(self) -> ColumnMatcher {
        use ColumnMatcher::{Contains, Exact};
        match self {
            LogicalField::MobilePhone => Exact("Mobile Phone"),
            LogicalField::BoardPosition => Exact("Board Position"),
            LogicalField::State => Exact("State"),
            LogicalField::ContactSheetColor => Contains {
                all: &["contact sheet color"],
                none: &[],
            },
            LogicalField::HasTranscript => Exact("Has Transcript"),
            LogicalField::LastEvaluation => Exact("Last Evaluation"),
            LogicalField::LastCalled => Contains {
                all: &["call", "last"],
                none: &["with"],
            },
            LogicalField::LastCallWith => Contains {
                all: &["call", "with"],
                none: &[],
            },
            LogicalField::LastTexted => Contains {
                all: &["text", "last"],
                none: &[],
            },
            LogicalField::MotherPhone => Exact("Mother's Mobile Phone"),
            LogicalField::MotherEmail => Exact("Mother's Email"),
            LogicalField::FatherPhone => Exact("Father's Mobile Phone"),
            LogicalField::FatherEmail => Exact("Father's Email"),
            LogicalField::HsName => Exact("HS Name"),
            LogicalField::HsPhone => Exact("HS Phone"),
        }
    }
}

/// Header names resolved for each logical field of one roster file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterSchema {
    columns: HashMap<LogicalField, String>,
}

impl RosterSchema {
    /// Resolve every logical field against a header row
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        let columns = LogicalField::ALL
            .into_iter()
            .filter_map(|field| {
                let matcher = field.matcher();
                headers
                    .iter()
                    .map(|h| h.as_ref())
                    .find(|h| matcher.matches(h))
                    .map(|h| (field, h.to_string()))
            })
            .collect();
        Self { columns }
    }

    /// Actual header for a field, if the export has one
    pub fn column(&self, field: LogicalField) -> Option<&str> {
        self.columns.get(&field).map(|c| c.as_str())
    }

    pub fn is_resolved(&self, field: LogicalField) -> bool {
        self.columns.contains_key(&field)
    }

    /// Fields that found no header, in declaration order
    pub fn unresolved(&self) -> Vec<LogicalField> {
        LogicalField::ALL
            .into_iter()
            .filter(|f| !self.is_resolved(*f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_called_ignores_call_with_column() {
        let headers = ["Full Name", "Last Call With", "Last Called"];
        let schema = RosterSchema::resolve(&headers);

        assert_eq!(schema.column(LogicalField::LastCalled), Some("Last Called"));
        assert_eq!(schema.column(LogicalField::LastCallWith), Some("Last Call With"));
    }

    #[test]
    fn test_exact_match_does_not_confuse_parent_phones() {
        let headers = ["Mother's Mobile Phone", "mobile phone"];
        let schema = RosterSchema::resolve(&headers);

        assert_eq!(schema.column(LogicalField::MobilePhone), Some("mobile phone"));
        assert_eq!(schema.column(LogicalField::MotherPhone), Some("Mother's Mobile Phone"));
    }

    #[test]
    fn test_first_matching_header_wins() {
        let headers = ["Contact Sheet Color (2025)", "Contact Sheet Color"];
        let schema = RosterSchema::resolve(&headers);
        assert_eq!(
            schema.column(LogicalField::ContactSheetColor),
            Some("Contact Sheet Color (2025)")
        );
    }

    #[test]
    fn test_unresolved_fields_are_reported() {
        let schema = RosterSchema::resolve(&["Mobile Phone"]);
        assert!(schema.is_resolved(LogicalField::MobilePhone));
        assert!(schema.unresolved().contains(&LogicalField::LastCalled));
    }
}
