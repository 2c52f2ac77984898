//! ChronologicalAscending - Least Recently Called First
//!
//! Order: never called, then oldest call, then most recent call. Records
//! with the same timestamp keep their input order.

use super::RankingStrategy;
use crate::CALLED_PREFIX;
use crate::types::instant_of;
use data_loader::Record;
use rand::RngCore;
use tracing::debug;

pub struct ChronologicalAscending {
    prefix: String,
}

impl ChronologicalAscending {
    pub fn new() -> Self {
        Self {
            prefix: CALLED_PREFIX.to_string(),
        }
    }

    /// Rank on another recency prefix (default: `called`)
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Full ordering of the pool, before truncation
    pub fn order<'a>(&self, mut pool: Vec<&'a Record>) -> Vec<&'a Record> {
        // None orders before every Some, which puts never-called first
        pool.sort_by_key(|record| instant_of(record, &self.prefix));
        pool
    }
}

impl Default for ChronologicalAscending {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingStrategy for ChronologicalAscending {
    fn name(&self) -> &str {
        "ChronologicalAscending"
    }

    fn select<'a>(&self, pool: Vec<&'a Record>, limit: usize, _rng: &mut dyn RngCore) -> Vec<&'a Record> {
        let mut ordered = self.order(pool);
        ordered.truncate(limit);
        debug!("selected {} records by '{}' ascending", ordered.len(), self.prefix);
        ordered
    }
}
