//! RandomFromFarBucket - Uniform Draw From Overdue Records
//!
//! The pool is restricted to the far bucket. A pool no larger than the
//! limit is returned whole, in pool order; a larger one yields exactly
//! `limit` distinct records drawn without replacement.

use super::RankingStrategy;
use crate::CALLED_PREFIX;
use crate::types::bucket_of;
use data_loader::{DistanceBucket, Record};
use rand::RngCore;
use rand::seq::index;
use tracing::debug;

pub struct RandomFromFarBucket {
    prefix: String,
}

impl RandomFromFarBucket {
    pub fn new() -> Self {
        Self {
            prefix: CALLED_PREFIX.to_string(),
        }
    }

    /// Draw from another prefix's far bucket (default: `called`)
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

impl Default for RandomFromFarBucket {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingStrategy for RandomFromFarBucket {
    fn name(&self) -> &str {
        "RandomFromFarBucket"
    }

    fn select<'a>(&self, pool: Vec<&'a Record>, limit: usize, rng: &mut dyn RngCore) -> Vec<&'a Record> {
        let far: Vec<&'a Record> = pool
            .into_iter()
            .filter(|record| bucket_of(record, &self.prefix) == DistanceBucket::Far)
            .collect();

        if far.len() <= limit {
            debug!("far pool of {} fits in limit {}, taking all", far.len(), limit);
            return far;
        }

        debug!("drawing {} of {} far records", limit, far.len());
        index::sample(rng, far.len(), limit)
            .into_iter()
            .map(|idx| far[idx])
            .collect()
    }
}
