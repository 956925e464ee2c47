//! Per-predicate execution statistics.
//!
//! [`PredicateStatistics`] is updated concurrently by every worker that
//! evaluates the predicate. All counters are atomics, so recording never
//! blocks; a [`StatisticsSnapshot`] taken while workers are running is
//! consistent per field but not across fields.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free execution counters of one predicate.
#[derive(Debug)]
pub struct PredicateStatistics {
    num_executions: AtomicU64,
    num_satisfaction: AtomicU64,
    total_ns: AtomicU64,
    min_ns: AtomicU64,
    max_ns: AtomicU64,
}

impl PredicateStatistics {
    /// Empty counters.
    pub fn new() -> Self {
        Self {
            num_executions: AtomicU64::new(0),
            num_satisfaction: AtomicU64::new(0),
            total_ns: AtomicU64::new(0),
            min_ns: AtomicU64::new(u64::MAX),
            max_ns: AtomicU64::new(0),
        }
    }

    /// Record one evaluation that took `elapsed_ns` nanoseconds.
    pub fn record(&self, elapsed_ns: u64, satisfied: bool) {
        self.num_executions.fetch_add(1, Ordering::Relaxed);
        if satisfied {
            self.num_satisfaction.fetch_add(1, Ordering::Relaxed);
        }
        self.total_ns.fetch_add(elapsed_ns, Ordering::Relaxed);
        self.min_ns.fetch_min(elapsed_ns, Ordering::Relaxed);
        self.max_ns.fetch_max(elapsed_ns, Ordering::Relaxed);
    }

    /// Clear all counters.
    pub fn reset(&self) {
        self.num_executions.store(0, Ordering::Relaxed);
        self.num_satisfaction.store(0, Ordering::Relaxed);
        self.total_ns.store(0, Ordering::Relaxed);
        self.min_ns.store(u64::MAX, Ordering::Relaxed);
        self.max_ns.store(0, Ordering::Relaxed);
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        let num_executions = self.num_executions.load(Ordering::Relaxed);
        let min_ns = self.min_ns.load(Ordering::Relaxed);
        StatisticsSnapshot {
            num_executions,
            num_satisfaction: self.num_satisfaction.load(Ordering::Relaxed),
            total_ns: self.total_ns.load(Ordering::Relaxed),
            min_ns: if num_executions == 0 { 0 } else { min_ns },
            max_ns: self.max_ns.load(Ordering::Relaxed),
        }
    }
}

impl Default for PredicateStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain copy of [`PredicateStatistics`].
///
/// `min_ns` is `0` when `num_executions` is `0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    /// Number of recorded evaluations.
    pub num_executions: u64,
    /// Number of evaluations that reported the rule as satisfied.
    pub num_satisfaction: u64,
    /// Sum of evaluation times, nanoseconds.
    pub total_ns: u64,
    /// Fastest evaluation, nanoseconds.
    pub min_ns: u64,
    /// Slowest evaluation, nanoseconds.
    pub max_ns: u64,
}

impl StatisticsSnapshot {
    /// Combine two snapshots as if all evaluations had been recorded in one.
    pub fn merge(&self, other: &StatisticsSnapshot) -> StatisticsSnapshot {
        let min_ns = match (self.num_executions, other.num_executions) {
            (0, _) => other.min_ns,
            (_, 0) => self.min_ns,
            _ => self.min_ns.min(other.min_ns),
        };
        StatisticsSnapshot {
            num_executions: self.num_executions + other.num_executions,
            num_satisfaction: self.num_satisfaction + other.num_satisfaction,
            total_ns: self.total_ns + other.total_ns,
            min_ns,
            max_ns: self.max_ns.max(other.max_ns),
        }
    }

    /// Mean evaluation time in nanoseconds, `None` without executions.
    pub fn mean_ns(&self) -> Option<f64> {
        (self.num_executions > 0).then(|| self.total_ns as f64 / self.num_executions as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn empty_snapshot_is_zero() {
        let s = PredicateStatistics::new().snapshot();
        assert_eq!(s, StatisticsSnapshot::default());
        assert_eq!(s.mean_ns(), None);
    }

    #[test]
    fn record_tracks_extremes() {
        let stats = PredicateStatistics::new();
        stats.record(50, true);
        stats.record(10, false);
        stats.record(30, true);
        let s = stats.snapshot();
        assert_eq!(s.num_executions, 3);
        assert_eq!(s.num_satisfaction, 2);
        assert_eq!(s.total_ns, 90);
        assert_eq!(s.min_ns, 10);
        assert_eq!(s.max_ns, 50);
        assert_eq!(s.mean_ns(), Some(30.0));
        stats.reset();
        assert_eq!(stats.snapshot(), StatisticsSnapshot::default());
    }

    #[test]
    fn concurrent_records_are_not_lost() {
        let stats = Arc::new(PredicateStatistics::new());
        let handles: Vec<_> = (0..8u64)
            .map(|i| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for j in 0..1000u64 {
                        stats.record(i * 1000 + j + 1, j % 2 == 0);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let s = stats.snapshot();
        assert_eq!(s.num_executions, 8000);
        assert_eq!(s.num_satisfaction, 4000);
        assert_eq!(s.min_ns, 1);
        assert_eq!(s.max_ns, 8000);
        assert_eq!(s.total_ns, (1..=8000u64).sum::<u64>());
    }

    proptest! {
        #[test]
        fn merge_matches_single_record(
            a in proptest::collection::vec((1u64..1_000_000, any::<bool>()), 0..20),
            b in proptest::collection::vec((1u64..1_000_000, any::<bool>()), 0..20),
        ) {
            let left = PredicateStatistics::new();
            let right = PredicateStatistics::new();
            let all = PredicateStatistics::new();
            for &(ns, sat) in &a {
                left.record(ns, sat);
                all.record(ns, sat);
            }
            for &(ns, sat) in &b {
                right.record(ns, sat);
                all.record(ns, sat);
            }
            prop_assert_eq!(left.snapshot().merge(&right.snapshot()), all.snapshot());
        }
    }
}
