//! Interchangeable orderings over a candidate pool.

pub mod bucket_priority;
pub mod chronological;
pub mod random_far;

pub use bucket_priority::BucketPriority;
pub use chronological::ChronologicalAscending;
pub use random_far::RandomFromFarBucket;

use data_loader::Record;
use rand::RngCore;

/// A way of picking up to `limit` records from a pool.
///
/// Strategies borrow from the pool and never mutate records. The random
/// source is always passed in so callers control reproducibility; the
/// deterministic strategies ignore it.
pub trait RankingStrategy: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    fn select<'a>(&self, pool: Vec<&'a Record>, limit: usize, rng: &mut dyn RngCore) -> Vec<&'a Record>;
}
