//! # Ranking Crate
//!
//! This crate decides which classified records get called next.
//!
//! ## Components
//!
//! ### Caller exclusion
//! Every strategy first drops records whose "last call with" value is on
//! the configured exclusion list.
//!
//! ### Strategies
//! - **ChronologicalAscending**: never-called first, then oldest call first
//! - **BucketPriority**: far, then never, then recent, most overdue first,
//!   with the texted bucket as a tie breaker
//! - **RandomFromFarBucket**: a uniform draw from the far bucket
//!
//! ## Example Usage
//!
//! ```ignore
//! use ranking::{CallerExclusion, Ranker, StrategyKind};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let ranker = Ranker::from_kind(StrategyKind::BucketPriority, 5)
//!     .with_exclusion(CallerExclusion::new(Some("Last Call With"), ["Coach A"]));
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let selected = ranker.rank(&classified, &mut rng);
//! ```
//!
//! Selection borrows from the input set; nothing is mutated.

pub mod exclusion;
pub mod ranker;
pub mod strategies;
pub mod types;

// Re-export commonly used types
pub use exclusion::CallerExclusion;
pub use ranker::Ranker;
pub use strategies::{BucketPriority, ChronologicalAscending, RandomFromFarBucket, RankingStrategy};
pub use types::{StrategyKind, bucket_of, days_since, instant_of};

/// Prefix of the primary (call) recency columns
pub const CALLED_PREFIX: &str = "called";

/// Prefix of the secondary (text) recency columns
pub const TEXTED_PREFIX: &str = "texted";
