//! Tally tracked recruits per game by contact sheet color.

use crate::recruits::normalize_name;
use crate::types::{ColorCounts, GameRecord, ProcessedGame};
use data_loader::{ContactColor, FULL_NAME, RecordSet};
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Lowercased full name -> contact sheet color
#[derive(Debug, Clone, Default)]
pub struct ColorLookup {
    by_name: HashMap<String, ContactColor>,
}

impl ColorLookup {
    /// Build from a consolidated roster. Rows without a name or with an
    /// unrecognised color are skipped; a later row wins over an earlier one.
    pub fn from_roster(roster: &RecordSet, color_column: Option<&str>) -> Self {
        let Some(column) = color_column else {
            warn!("no contact sheet color column, schedule enrichment will match nobody");
            return Self::default();
        };

        let mut by_name = HashMap::new();
        for record in roster {
            let name = record.value(FULL_NAME).trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            match record.value(column).parse::<ContactColor>() {
                Ok(color) => {
                    by_name.insert(name, color);
                }
                Err(_) => debug!("no usable color for '{}'", name),
            }
        }
        debug!("color lookup holds {} names", by_name.len());
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<ContactColor> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

pub struct ScheduleEnricher {
    lookup: ColorLookup,
}

impl ScheduleEnricher {
    pub fn new(lookup: ColorLookup) -> Self {
        Self { lookup }
    }

    /// Matching uses the normalized name; a matched entry is kept exactly
    /// as the game lists it.
    fn enrich_game(&self, game: &ProcessedGame) -> GameRecord {
        let mut color_counts = ColorCounts::new();
        let mut recruits = Vec::new();
        for recruit in &game.recruits {
            if let Some(color) = self.lookup.get(&normalize_name(recruit)) {
                color_counts.increment(color);
                recruits.push(recruit.clone());
            }
        }

        GameRecord {
            date: game.date.clone(),
            school_1: game.school_1.clone(),
            school_2: game.school_2.clone(),
            recruits,
            total_tracked: color_counts.total(),
            color_counts,
        }
    }

    /// Enrich every game and order by tracked recruits, most first.
    /// Games with equal totals keep their schedule order.
    pub fn enrich(&self, games: &[ProcessedGame]) -> Vec<GameRecord> {
        let mut records: Vec<GameRecord> = games.iter().map(|g| self.enrich_game(g)).collect();
        records.sort_by_key(|g| Reverse(g.total_tracked));

        info!(
            "enriched {} games, {} with tracked recruits",
            records.len(),
            records.iter().filter(|g| g.total_tracked > 0).count()
        );
        records
    }
}
