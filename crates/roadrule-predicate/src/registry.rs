//! Name-keyed predicate registry with per-predicate statistics.

use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;

use roadrule_core::TimeStep;
use roadrule_network::Lane;
use roadrule_obstacle::Obstacle;

use crate::context::EvaluationContext;
use crate::error::EvaluationError;
use crate::predicate::{Constraint, LanePredicate, Predicate};
use crate::predicates::{InFrontOf, InLane, InSameLane, InStandstill, SafeDistance};
use crate::statistics::{PredicateStatistics, StatisticsSnapshot};

struct Entry<P: ?Sized> {
    predicate: Arc<P>,
    stats: PredicateStatistics,
}

impl<P: ?Sized> Entry<P> {
    fn new(predicate: Arc<P>) -> Self {
        Self {
            predicate,
            stats: PredicateStatistics::new(),
        }
    }
}

/// Obstacle-level and lane-level predicates by name.
///
/// Construct one registry per run and share it by reference with every
/// worker. The `boolean`, `robust`, and `constraint` methods time each
/// evaluation and record it in the predicate's statistics; failed
/// evaluations are not recorded. A boolean result counts as satisfied
/// when `true`, a robust result when positive.
///
/// # Examples
///
/// ```
/// use roadrule_predicate::PredicateRegistry;
///
/// let registry = PredicateRegistry::with_defaults();
/// assert!(registry.predicate("safe_distance").is_ok());
/// assert!(registry.lane_predicate("in_lane").is_ok());
/// assert!(registry.predicate("teleports").is_err());
/// ```
#[derive(Default)]
pub struct PredicateRegistry {
    obstacle: IndexMap<String, Entry<dyn Predicate>>,
    lane: IndexMap<String, Entry<dyn LanePredicate>>,
}

impl PredicateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in predicate.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SafeDistance));
        registry.register(Arc::new(InSameLane));
        registry.register(Arc::new(InFrontOf));
        registry.register(Arc::new(InStandstill));
        registry.register_lane(Arc::new(InLane));
        registry
    }

    /// A registry sharing this one's predicates, with zeroed statistics.
    pub fn fork(&self) -> Self {
        Self {
            obstacle: fork_entries(&self.obstacle),
            lane: fork_entries(&self.lane),
        }
    }

    /// Add an obstacle-level predicate under its name, returning the
    /// predicate it replaces. A replaced predicate's statistics are
    /// discarded.
    pub fn register(&mut self, predicate: Arc<dyn Predicate>) -> Option<Arc<dyn Predicate>> {
        let name = predicate.name().to_owned();
        self.obstacle
            .insert(name, Entry::new(predicate))
            .map(|old| old.predicate)
    }

    /// Add a lane-level predicate under its name, returning the
    /// predicate it replaces.
    pub fn register_lane(
        &mut self,
        predicate: Arc<dyn LanePredicate>,
    ) -> Option<Arc<dyn LanePredicate>> {
        let name = predicate.name().to_owned();
        self.lane
            .insert(name, Entry::new(predicate))
            .map(|old| old.predicate)
    }

    /// Look up an obstacle-level predicate.
    pub fn predicate(&self, name: &str) -> Result<&Arc<dyn Predicate>, EvaluationError> {
        self.obstacle_entry(name).map(|e| &e.predicate)
    }

    /// Look up a lane-level predicate.
    pub fn lane_predicate(&self, name: &str) -> Result<&Arc<dyn LanePredicate>, EvaluationError> {
        self.lane_entry(name).map(|e| &e.predicate)
    }

    /// Names of the obstacle-level predicates in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.obstacle.keys().map(String::as_str)
    }

    /// Names of the lane-level predicates in registration order.
    pub fn lane_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.lane.keys().map(String::as_str)
    }

    /// Statistics of the predicate called `name`, of either level.
    pub fn statistics(&self, name: &str) -> Option<StatisticsSnapshot> {
        self.obstacle
            .get(name)
            .map(|e| e.stats.snapshot())
            .or_else(|| self.lane.get(name).map(|e| e.stats.snapshot()))
    }

    /// Statistics of every predicate, obstacle-level first.
    pub fn all_statistics(&self) -> Vec<(String, StatisticsSnapshot)> {
        self.obstacle
            .iter()
            .map(|(n, e)| (n.clone(), e.stats.snapshot()))
            .chain(self.lane.iter().map(|(n, e)| (n.clone(), e.stats.snapshot())))
            .collect()
    }

    /// Clear the statistics of every predicate.
    pub fn reset_statistics(&self) {
        for e in self.obstacle.values() {
            e.stats.reset();
        }
        for e in self.lane.values() {
            e.stats.reset();
        }
    }

    // ── Recorded evaluation ────────────────────────────────────────

    /// Boolean evaluation of `name`, recorded.
    pub fn boolean(
        &self,
        name: &str,
        time_step: TimeStep,
        ctx: &EvaluationContext<'_>,
        ego: &Obstacle,
        other: Option<&Obstacle>,
    ) -> Result<bool, EvaluationError> {
        let entry = self.obstacle_entry(name)?;
        timed(
            &entry.stats,
            || entry.predicate.boolean_evaluation(time_step, ctx, ego, other),
            |b: &bool| *b,
        )
    }

    /// Robust evaluation of `name`, recorded.
    pub fn robust(
        &self,
        name: &str,
        time_step: TimeStep,
        ctx: &EvaluationContext<'_>,
        ego: &Obstacle,
        other: Option<&Obstacle>,
    ) -> Result<f64, EvaluationError> {
        let entry = self.obstacle_entry(name)?;
        timed(
            &entry.stats,
            || entry.predicate.robust_evaluation(time_step, ctx, ego, other),
            |r: &f64| *r > 0.0,
        )
    }

    /// Constraint evaluation of `name`, recorded without satisfaction.
    pub fn constraint(
        &self,
        name: &str,
        time_step: TimeStep,
        ctx: &EvaluationContext<'_>,
        ego: &Obstacle,
        other: Option<&Obstacle>,
    ) -> Result<Constraint, EvaluationError> {
        let entry = self.obstacle_entry(name)?;
        timed(
            &entry.stats,
            || entry.predicate.constraint_evaluation(time_step, ctx, ego, other),
            |_: &Constraint| false,
        )
    }

    /// Boolean evaluation of the lane predicate `name`, recorded.
    pub fn lane_boolean(
        &self,
        name: &str,
        lane_k: &Lane,
        lane_p: &Lane,
    ) -> Result<bool, EvaluationError> {
        let entry = self.lane_entry(name)?;
        timed(
            &entry.stats,
            || entry.predicate.boolean_evaluation(lane_k, lane_p),
            |b: &bool| *b,
        )
    }

    /// Robust evaluation of the lane predicate `name`, recorded.
    pub fn lane_robust(
        &self,
        name: &str,
        lane_k: &Lane,
        lane_p: &Lane,
    ) -> Result<f64, EvaluationError> {
        let entry = self.lane_entry(name)?;
        timed(
            &entry.stats,
            || entry.predicate.robust_evaluation(lane_k, lane_p),
            |r: &f64| *r > 0.0,
        )
    }

    /// Constraint evaluation of the lane predicate `name`, recorded.
    pub fn lane_constraint(
        &self,
        name: &str,
        lane_k: &Lane,
        lane_p: &Lane,
    ) -> Result<Constraint, EvaluationError> {
        let entry = self.lane_entry(name)?;
        timed(
            &entry.stats,
            || entry.predicate.constraint_evaluation(lane_k, lane_p),
            |_: &Constraint| false,
        )
    }

    fn obstacle_entry(&self, name: &str) -> Result<&Entry<dyn Predicate>, EvaluationError> {
        self.obstacle
            .get(name)
            .ok_or_else(|| EvaluationError::UnknownPredicate {
                name: name.to_owned(),
            })
    }

    fn lane_entry(&self, name: &str) -> Result<&Entry<dyn LanePredicate>, EvaluationError> {
        self.lane
            .get(name)
            .ok_or_else(|| EvaluationError::UnknownPredicate {
                name: name.to_owned(),
            })
    }
}

fn fork_entries<P: ?Sized>(entries: &IndexMap<String, Entry<P>>) -> IndexMap<String, Entry<P>> {
    entries
        .iter()
        .map(|(name, e)| (name.clone(), Entry::new(Arc::clone(&e.predicate))))
        .collect()
}

fn timed<T>(
    stats: &PredicateStatistics,
    eval: impl FnOnce() -> Result<T, EvaluationError>,
    satisfied: impl FnOnce(&T) -> bool,
) -> Result<T, EvaluationError> {
    let start = Instant::now();
    let result = eval()?;
    let elapsed = start.elapsed().as_nanos() as u64;
    stats.record(elapsed, satisfied(&result));
    Ok(result)
}
