//! Drops records last handled by an excluded caller.

use data_loader::Record;
use std::collections::HashSet;

/// Exclusion list matched against the "last call with" column.
///
/// Both sides are trimmed and lowercased before comparing.
#[derive(Debug, Clone, Default)]
pub struct CallerExclusion {
    column: Option<String>,
    callers: HashSet<String>,
}

impl CallerExclusion {
    pub fn new<I, S>(column: Option<&str>, callers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            column: column.map(str::to_string),
            callers: callers
                .into_iter()
                .map(|c| c.as_ref().trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    /// Column the exclusion reads, if one resolved
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.column.is_some() && !self.callers.is_empty()
    }

    pub fn is_excluded(&self, record: &Record) -> bool {
        match &self.column {
            Some(column) => self.callers.contains(&record.value(column).trim().to_lowercase()),
            None => false,
        }
    }

    /// Keep the records not excluded, in order
    pub fn apply<'a>(&self, records: impl IntoIterator<Item = &'a Record>) -> Vec<&'a Record> {
        records.into_iter().filter(|r| !self.is_excluded(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_ignore_case_and_whitespace() {
        let exclusion = CallerExclusion::new(Some("Last Call With"), ["Kim Grell", "  ALEX B "]);
        let records = vec![
            Record::from_pairs([("Last Call With", " kim grell")]),
            Record::from_pairs([("Last Call With", "Alex B")]),
            Record::from_pairs([("Last Call With", "Coach C")]),
            Record::from_pairs([("Last Call With", "")]),
        ];

        let kept = exclusion.apply(&records);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].value("Last Call With"), "Coach C");
    }

    #[test]
    fn test_without_column_nothing_is_excluded() {
        let exclusion = CallerExclusion::new(None, ["Kim Grell"]);
        let records = vec![Record::from_pairs([("Last Call With", "Kim Grell")])];
        assert!(!exclusion.is_active());
        assert_eq!(exclusion.apply(&records).len(), 1);
    }
}
