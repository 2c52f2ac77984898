//! BucketPriority - Most Overdue First
//!
//! Stable sort ascending on
//! `(primary rank, secondary rank, -days since primary, -days since secondary)`
//! where the rank is far=0, never=1, recent=2. Unknown day counts sort as
//! the most overdue.

use super::RankingStrategy;
use crate::types::{bucket_of, days_since};
use crate::{CALLED_PREFIX, TEXTED_PREFIX};
use data_loader::{DistanceBucket, Record};
use rand::RngCore;
use std::cmp::Reverse;
use tracing::debug;

const UNKNOWN_DAYS: i64 = i64::MAX;

fn bucket_rank(bucket: DistanceBucket) -> u8 {
    match bucket {
        DistanceBucket::Far => 0,
        DistanceBucket::Never => 1,
        DistanceBucket::Recent => 2,
    }
}

type PriorityKey = (u8, u8, Reverse<i64>, Reverse<i64>);

pub struct BucketPriority {
    primary: String,
    secondary: String,
}

impl BucketPriority {
    pub fn new() -> Self {
        Self {
            primary: CALLED_PREFIX.to_string(),
            secondary: TEXTED_PREFIX.to_string(),
        }
    }

    /// Configure the recency prefixes (default: `called`, `texted`)
    pub fn with_prefixes(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.primary = primary.into();
        self.secondary = secondary.into();
        self
    }

    fn key(&self, record: &Record) -> PriorityKey {
        (
            bucket_rank(bucket_of(record, &self.primary)),
            bucket_rank(bucket_of(record, &self.secondary)),
            Reverse(days_since(record, &self.primary).unwrap_or(UNKNOWN_DAYS)),
            Reverse(days_since(record, &self.secondary).unwrap_or(UNKNOWN_DAYS)),
        )
    }

    pub fn order<'a>(&self, mut pool: Vec<&'a Record>) -> Vec<&'a Record> {
        pool.sort_by_cached_key(|record| self.key(record));
        pool
    }
}

impl Default for BucketPriority {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingStrategy for BucketPriority {
    fn name(&self) -> &str {
        "BucketPriority"
    }

    fn select<'a>(&self, pool: Vec<&'a Record>, limit: usize, _rng: &mut dyn RngCore) -> Vec<&'a Record> {
        let mut ordered = self.order(pool);
        ordered.truncate(limit);
        debug!(
            "selected {} records by bucket priority ({}, {})",
            ordered.len(),
            self.primary,
            self.secondary
        );
        ordered
    }
}
