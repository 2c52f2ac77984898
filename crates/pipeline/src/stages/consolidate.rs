//! Name consolidation and guardian fallback.
//!
//! Roster exports split names into first/last columns and carry parents
//! twice: once as "Mother's ..."/"Father's ..." and once as generic
//! "Parent/Guardian N ..." columns. This stage produces one full-name
//! column per person and folds the guardian columns into the parent
//! columns, so later stages see a single place for each fact.
//!
//! Shape contract:
//! - added: each configured output column whose first/last pair resolved,
//!   plus any guardian target name column that did not exist yet
//! - removed: the first/last source columns that were merged, and every
//!   guardian source column that resolved (used or not)

use crate::traits::{RunContext, Stage};
use anyhow::Result;
use data_loader::{FATHER_FULL_NAME, FULL_NAME, MOTHER_FULL_NAME, RecordSet};
use serde::{Deserialize, Serialize};
use tracing::info;

/// First/last column pair merged into one output column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePair {
    pub first: String,
    pub last: String,
    pub output: String,
}

impl NamePair {
    pub fn new(first: impl Into<String>, last: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
            output: output.into(),
        }
    }

    /// Player, mother and father name pairs as they appear in roster exports
    pub fn defaults() -> Vec<NamePair> {
        vec![
            NamePair::new("First Name", "Last Name", FULL_NAME),
            NamePair::new("Mother's First Name", "Mother's Last Name", MOTHER_FULL_NAME),
            NamePair::new("Father's First Name", "Father's Last Name", FATHER_FULL_NAME),
        ]
    }
}

/// A parent slot that falls back to a generic guardian when empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianSlot {
    pub target_name: String,
    pub target_phone: String,
    pub source_name: String,
    pub source_phone: String,
}

impl GuardianSlot {
    pub fn new(
        target_name: impl Into<String>,
        target_phone: impl Into<String>,
        source_name: impl Into<String>,
        source_phone: impl Into<String>,
    ) -> Self {
        Self {
            target_name: target_name.into(),
            target_phone: target_phone.into(),
            source_name: source_name.into(),
            source_phone: source_phone.into(),
        }
    }

    /// Mother ← Parent/Guardian 1, Father ← Parent/Guardian 2
    pub fn defaults() -> Vec<GuardianSlot> {
        vec![
            GuardianSlot::new(
                MOTHER_FULL_NAME,
                "Mother's Mobile Phone",
                "Parent/Guardian 1 Name",
                "Parent/Guardian 1 Phone",
            ),
            GuardianSlot::new(
                FATHER_FULL_NAME,
                "Father's Mobile Phone",
                "Parent/Guardian 2 Name",
                "Parent/Guardian 2 Phone",
            ),
        ]
    }
}

/// Result of consolidation: the new table plus its shape change
#[derive(Debug, Clone, PartialEq)]
pub struct Consolidation {
    pub records: RecordSet,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Merges name pairs and applies guardian fallbacks.
pub struct FieldConsolidator {
    name_pairs: Vec<NamePair>,
    guardian_slots: Vec<GuardianSlot>,
}

impl FieldConsolidator {
    pub fn new(name_pairs: Vec<NamePair>, guardian_slots: Vec<GuardianSlot>) -> Self {
        Self {
            name_pairs,
            guardian_slots,
        }
    }

    /// Run both consolidation steps and report which columns changed.
    pub fn consolidate(&self, records: RecordSet) -> Consolidation {
        let mut set = records;
        let mut added = Vec::new();
        let mut removed = Vec::new();

        self.merge_name_pairs(&mut set, &mut added, &mut removed);
        self.apply_guardian_fallbacks(&mut set, &mut added, &mut removed);

        Consolidation {
            records: set,
            added,
            removed,
        }
    }

    fn merge_name_pairs(&self, set: &mut RecordSet, added: &mut Vec<String>, removed: &mut Vec<String>) {
        for pair in &self.name_pairs {
            let (Some(first), Some(last)) = (
                set.resolve_column(&pair.first).map(str::to_string),
                set.resolve_column(&pair.last).map(str::to_string),
            ) else {
                continue;
            };

            set.add_column(pair.output.clone());
            for record in set.records_mut() {
                let full = format!("{} {}", record.value(&first).trim(), record.value(&last).trim());
                record.set(pair.output.clone(), full.trim());
            }

            for source in [&first, &last] {
                if !source.eq_ignore_ascii_case(&pair.output) && set.drop_column(source) {
                    removed.push(source.clone());
                }
            }
            added.push(pair.output.clone());
            info!("merged '{}' + '{}' → '{}'", first, last, pair.output);
        }
    }

    fn apply_guardian_fallbacks(
        &self,
        set: &mut RecordSet,
        added: &mut Vec<String>,
        removed: &mut Vec<String>,
    ) {
        // Source columns are resolved up front and dropped only after every
        // slot ran, so slots cannot observe each other's changes.
        let mut sources_to_drop: Vec<String> = Vec::new();

        for slot in &self.guardian_slots {
            let source_name = set.resolve_column(&slot.source_name).map(str::to_string);
            let source_phone = set.resolve_column(&slot.source_phone).map(str::to_string);
            sources_to_drop.extend(source_name.iter().cloned());
            sources_to_drop.extend(source_phone.iter().cloned());

            let Some(source_name) = source_name else {
                continue;
            };

            if !set.has_column(&slot.target_name) {
                set.add_column(slot.target_name.clone());
                added.push(slot.target_name.clone());
            }
            let target_phone = set.resolve_column(&slot.target_phone).map(str::to_string);
            let copy_phone = match (&target_phone, &source_phone) {
                (Some(target), Some(source)) => Some((target.clone(), source.clone())),
                _ => None,
            };

            let mut filled = 0usize;
            for record in set.records_mut() {
                if !record.value(&slot.target_name).trim().is_empty() {
                    continue;
                }
                let guardian = record.value(&source_name).trim().to_string();
                record.set(slot.target_name.clone(), guardian);
                if let Some((target, source)) = &copy_phone {
                    let phone = record.value(source).trim().to_string();
                    record.set(target.clone(), phone);
                }
                filled += 1;
            }
            info!(
                "filled {} empty '{}' values from '{}'",
                filled, slot.target_name, source_name
            );
        }

        for column in sources_to_drop {
            if set.drop_column(&column) {
                removed.push(column);
            }
        }
    }
}

impl Default for FieldConsolidator {
    fn default() -> Self {
        Self::new(NamePair::defaults(), GuardianSlot::defaults())
    }
}

impl Stage for FieldConsolidator {
    fn name(&self) -> &str {
        "FieldConsolidator"
    }

    fn apply(&self, records: RecordSet, _context: &RunContext) -> Result<RecordSet> {
        let consolidation = self.consolidate(records);
        tracing::debug!(
            "consolidation added {:?}, removed {:?}",
            consolidation.added,
            consolidation.removed
        );
        Ok(consolidation.records)
    }
}
