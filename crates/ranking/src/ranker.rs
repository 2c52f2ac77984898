//! Exclusion plus strategy, as one selection step.

use crate::exclusion::CallerExclusion;
use crate::strategies::{BucketPriority, ChronologicalAscending, RandomFromFarBucket, RankingStrategy};
use crate::types::StrategyKind;
use data_loader::{Record, RecordSet};
use rand::RngCore;
use tracing::{info, instrument};

/// Picks the next records to call
pub struct Ranker {
    exclusion: CallerExclusion,
    strategy: Box<dyn RankingStrategy>,
    limit: usize,
}

impl Ranker {
    pub fn new(strategy: Box<dyn RankingStrategy>, limit: usize) -> Self {
        Self {
            exclusion: CallerExclusion::default(),
            strategy,
            limit,
        }
    }

    /// Build the ranker for a configured strategy with its default prefixes
    pub fn from_kind(kind: StrategyKind, limit: usize) -> Self {
        let strategy: Box<dyn RankingStrategy> = match kind {
            StrategyKind::Chronological => Box::new(ChronologicalAscending::new()),
            StrategyKind::BucketPriority => Box::new(BucketPriority::new()),
            StrategyKind::RandomFar => Box::new(RandomFromFarBucket::new()),
        };
        Self::new(strategy, limit)
    }

    pub fn with_exclusion(mut self, exclusion: CallerExclusion) -> Self {
        self.exclusion = exclusion;
        self
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Every record left after caller exclusion, never called first and
    /// then oldest call first. The top selection is cut from this pool.
    pub fn call_sheet<'a>(&self, records: &'a RecordSet) -> Vec<&'a Record> {
        ChronologicalAscending::new().order(self.exclusion.apply(records))
    }

    /// Drop excluded callers, then let the strategy pick up to `limit`
    #[instrument(skip(self, records, rng), fields(strategy = self.strategy.name(), limit = self.limit))]
    pub fn rank<'a>(&self, records: &'a RecordSet, rng: &mut dyn RngCore) -> Vec<&'a Record> {
        let pool = self.exclusion.apply(records);
        if let Some(column) = self.exclusion.column().filter(|_| self.exclusion.is_active()) {
            info!(
                "caller exclusion on '{}' removed {} of {} records",
                column,
                records.len() - pool.len(),
                records.len()
            );
        }

        let selected = self.strategy.select(pool, self.limit, rng);
        info!("selected {} records", selected.len());
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{DistanceBucket, RecencyMark};
    use rand::{SeedableRng, rngs::StdRng};

    fn roster() -> RecordSet {
        let mut set = RecordSet::new(vec!["Name".into(), "Last Call With".into()]);
        let rows = [
            ("Ann", "Coach A", DistanceBucket::Far, Some(400)),
            ("Bo", "Kim Grell", DistanceBucket::Never, None),
            ("Cy", "", DistanceBucket::Never, None),
            ("Di", "Coach B", DistanceBucket::Recent, Some(20)),
        ];
        for (name, caller, bucket, days) in rows {
            let mut record = Record::from_pairs([("Name", name), ("Last Call With", caller)]);
            record.set_recency(
                "called",
                RecencyMark {
                    instant: None,
                    days_since: days,
                    bucket,
                },
            );
            set.push(record);
        }
        set
    }

    #[test]
    fn test_exclusion_applies_before_every_strategy() {
        let set = roster();
        let exclusion = CallerExclusion::new(Some("Last Call With"), ["kim grell"]);

        for kind in StrategyKind::ALL {
            let ranker = Ranker::from_kind(kind, 10).with_exclusion(exclusion.clone());
            let selected = ranker.rank(&set, &mut StdRng::seed_from_u64(1));
            assert!(
                selected.iter().all(|r| r.value("Name") != "Bo"),
                "{kind} kept an excluded caller"
            );
        }
    }

    #[test]
    fn test_call_sheet_is_untruncated_and_excludes_callers() {
        let set = roster();
        let exclusion = CallerExclusion::new(Some("Last Call With"), ["kim grell"]);

        for kind in StrategyKind::ALL {
            let ranker = Ranker::from_kind(kind, 1).with_exclusion(exclusion.clone());
            let sheet: Vec<_> = ranker.call_sheet(&set).iter().map(|r| r.value("Name")).collect();
            // No instants on the marks, so every record ties and keeps input order
            assert_eq!(sheet, vec!["Ann", "Cy", "Di"], "{kind}");
        }
    }

    #[test]
    fn test_bucket_priority_through_ranker() {
        let set = roster();
        let ranker = Ranker::from_kind(StrategyKind::BucketPriority, 2);
        let selected = ranker.rank(&set, &mut StdRng::seed_from_u64(1));

        let names: Vec<_> = selected.iter().map(|r| r.value("Name")).collect();
        assert_eq!(names, vec!["Ann", "Bo"]);
        assert_eq!(ranker.strategy_name(), "BucketPriority");
    }
}
