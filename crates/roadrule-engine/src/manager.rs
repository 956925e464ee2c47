//! Multi-threaded predicate evaluation.
//!
//! [`PredicateManager`] spawns its workers once and keeps them for its
//! lifetime. Each [`evaluate`](PredicateManager::evaluate) call packs
//! the world, a forked registry, and the unit list into one shared
//! batch, sends one task per unit over the bounded task channel, and
//! waits on the per-task reply channels in unit order. Output order is
//! therefore independent of the worker count and of scheduling.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};

use roadrule_core::{ObstacleId, PredicateParameters, TimeStep};
use roadrule_predicate::{EvaluationError, PredicateRegistry, StatisticsSnapshot};

use crate::config::{ConfigError, ManagerConfig};
use crate::error::BatchError;
use crate::metrics::BatchMetrics;
use crate::world::World;

// ── EvaluationUnit ─────────────────────────────────────────────────

/// One boolean evaluation: a predicate, an ego, an optional second
/// obstacle, and a time step.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EvaluationUnit {
    /// Registered predicate name.
    pub predicate: String,
    /// The ego obstacle.
    pub ego: ObstacleId,
    /// The second obstacle of vehicle-dependent predicates.
    pub other: Option<ObstacleId>,
    /// Time step to evaluate at.
    pub time_step: TimeStep,
}

impl EvaluationUnit {
    /// Every unit of `predicates` over `world`.
    ///
    /// For each ego and each of its time steps, a vehicle-dependent
    /// predicate yields one unit per other obstacle present at that time
    /// step (static obstacles are always present); any other predicate
    /// yields a single unit without a second obstacle. Units are ordered
    /// by ego, time step, predicate, then other obstacle, following the
    /// world's obstacle order.
    ///
    /// # Errors
    ///
    /// [`EvaluationError::UnknownPredicate`] for a name missing from
    /// `registry`.
    pub fn for_world(
        world: &World,
        registry: &PredicateRegistry,
        predicates: &[&str],
    ) -> Result<Vec<EvaluationUnit>, EvaluationError> {
        let mut dependent = Vec::with_capacity(predicates.len());
        for &name in predicates {
            dependent.push((name, registry.predicate(name)?.vehicle_dependent()));
        }
        let mut units = Vec::new();
        for ego in world.egos() {
            for time_step in ego.time_steps() {
                for &(name, vehicle_dependent) in &dependent {
                    if !vehicle_dependent {
                        units.push(EvaluationUnit {
                            predicate: name.to_owned(),
                            ego: ego.id(),
                            other: None,
                            time_step,
                        });
                        continue;
                    }
                    for other in world.all_obstacles() {
                        let present = other.is_static() || other.time_step_exists(time_step);
                        if other.id() == ego.id() || !present {
                            continue;
                        }
                        units.push(EvaluationUnit {
                            predicate: name.to_owned(),
                            ego: ego.id(),
                            other: Some(other.id()),
                            time_step,
                        });
                    }
                }
            }
        }
        Ok(units)
    }
}

// ── Reports ────────────────────────────────────────────────────────

/// Outcome of one unit.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitResult {
    /// The evaluated unit.
    pub unit: EvaluationUnit,
    /// Boolean result, or why there is none.
    pub outcome: Result<bool, BatchError>,
}

/// Results of evaluating one world.
#[derive(Clone, Debug)]
pub struct BatchReport {
    /// The world's name.
    pub world: String,
    /// One entry per unit, in unit order.
    pub results: Vec<UnitResult>,
    /// Statistics of every registered predicate over this batch only.
    pub statistics: Vec<(String, StatisticsSnapshot)>,
    /// Timing and volume.
    pub metrics: BatchMetrics,
}

impl BatchReport {
    /// Units whose outcome is an error.
    pub fn failures(&self) -> impl Iterator<Item = &UnitResult> {
        self.results.iter().filter(|r| r.outcome.is_err())
    }

    /// Number of units that evaluated to `true`.
    pub fn satisfied(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, Ok(true)))
            .count()
    }
}

/// Results of [`PredicateManager::evaluate_many`].
#[derive(Clone, Debug)]
pub struct MultiWorldReport {
    /// One report per world, in input order.
    pub reports: Vec<BatchReport>,
    /// Per-predicate statistics merged over every world.
    pub statistics: Vec<(String, StatisticsSnapshot)>,
    /// Metrics summed over every world.
    pub metrics: BatchMetrics,
}

// ── Worker protocol ────────────────────────────────────────────────

/// Everything a worker needs to evaluate units of one batch.
struct Batch {
    world: Arc<World>,
    registry: PredicateRegistry,
    parameters: Arc<PredicateParameters>,
    units: Vec<EvaluationUnit>,
}

impl Batch {
    fn run(&self, index: usize) -> Result<bool, BatchError> {
        let unit = &self.units[index];
        let ctx = self.world.context(&self.parameters);
        let wrap = |error: EvaluationError| BatchError::Evaluation {
            obstacle: unit.ego,
            time_step: unit.time_step,
            predicate: unit.predicate.clone(),
            error,
        };
        let ego = self
            .world
            .find_obstacle(unit.ego)
            .ok_or_else(|| wrap(missing_obstacle(unit.ego)))?;
        let other = match unit.other {
            Some(id) => Some(
                self.world
                    .find_obstacle(id)
                    .ok_or_else(|| wrap(missing_obstacle(id)))?
                    .as_ref(),
            ),
            None => None,
        };
        self.registry
            .boolean(&unit.predicate, unit.time_step, &ctx, ego, other)
            .map_err(wrap)
    }
}

fn missing_obstacle(id: ObstacleId) -> EvaluationError {
    EvaluationError::InvalidInput {
        reason: format!("obstacle {id} is not part of the world"),
    }
}

struct EvalTask {
    batch: Arc<Batch>,
    index: usize,
    reply: Sender<Result<bool, BatchError>>,
}

fn worker_loop(task_rx: Receiver<EvalTask>) {
    while let Ok(task) = task_rx.recv() {
        let outcome = task.batch.run(task.index);
        let _ = task.reply.send(outcome);
    }
    // Channel closed: the manager is shutting down.
}

// ── PredicateManager ───────────────────────────────────────────────

/// Worker pool evaluating predicates over worlds.
///
/// Workers exit when the manager is dropped.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use roadrule_core::{PredicateParameters, TimeStep};
/// use roadrule_engine::{EvaluationUnit, ManagerConfig, PredicateManager, World};
/// use roadrule_network::RoadNetworkBuilder;
/// use roadrule_predicate::PredicateRegistry;
///
/// let network = Arc::new(RoadNetworkBuilder::new().build().unwrap());
/// let world = Arc::new(World::new("empty", TimeStep(0), network, vec![], vec![], 0.1).unwrap());
/// let manager = PredicateManager::new(
///     ManagerConfig::default(),
///     PredicateRegistry::with_defaults(),
///     PredicateParameters::default(),
/// )
/// .unwrap();
/// let units = EvaluationUnit::for_world(&world, manager.registry(), &["in_standstill"]).unwrap();
/// let report = manager.evaluate(&world, units);
/// assert!(report.results.is_empty());
/// ```
pub struct PredicateManager {
    registry: PredicateRegistry,
    parameters: Arc<PredicateParameters>,
    task_tx: Option<Sender<EvalTask>>,
    workers: Vec<JoinHandle<()>>,
}

impl PredicateManager {
    /// Spawn the worker pool.
    ///
    /// # Errors
    ///
    /// [`ConfigError::QueueDepthZero`] for an invalid config,
    /// [`ConfigError::ThreadSpawnFailed`] if a worker cannot be started.
    pub fn new(
        config: ManagerConfig,
        registry: PredicateRegistry,
        parameters: PredicateParameters,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let worker_count = config.resolved_worker_count();
        let (task_tx, task_rx) =
            crossbeam_channel::bounded(worker_count * config.queue_depth_per_worker);
        let mut workers = Vec::with_capacity(worker_count);
        for i in 0..worker_count {
            let task_rx = task_rx.clone();
            let handle = thread::Builder::new()
                .name(format!("roadrule-worker-{i}"))
                .spawn(move || worker_loop(task_rx))
                .map_err(|e| ConfigError::ThreadSpawnFailed {
                    reason: format!("roadrule-worker-{i}: {e}"),
                })?;
            workers.push(handle);
        }
        Ok(Self {
            registry,
            parameters: Arc::new(parameters),
            task_tx: Some(task_tx),
            workers,
        })
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// The registry every batch is forked from.
    pub fn registry(&self) -> &PredicateRegistry {
        &self.registry
    }

    /// Predicate thresholds passed to every evaluation.
    pub fn parameters(&self) -> &PredicateParameters {
        &self.parameters
    }

    /// Change one threshold for subsequent batches.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), BatchError> {
        Arc::make_mut(&mut self.parameters)
            .update(name, value)
            .map_err(|e| BatchError::Predicate(e.into()))
    }

    /// Evaluate `units` against `world`.
    ///
    /// Failing units do not abort the batch; their outcome is the error.
    /// If the pool has shut down every outcome is
    /// [`BatchError::WorkerPanicked`].
    pub fn evaluate(&self, world: &Arc<World>, units: Vec<EvaluationUnit>) -> BatchReport {
        let start = Instant::now();
        let batch = Arc::new(Batch {
            world: Arc::clone(world),
            registry: self.registry.fork(),
            parameters: Arc::clone(&self.parameters),
            units,
        });

        let mut replies = Vec::with_capacity(batch.units.len());
        for index in 0..batch.units.len() {
            let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
            let task = EvalTask {
                batch: Arc::clone(&batch),
                index,
                reply: reply_tx,
            };
            let sent = self
                .task_tx
                .as_ref()
                .map(|tx| tx.send(task).is_ok())
                .unwrap_or(false);
            replies.push(sent.then_some(reply_rx));
        }

        let outcomes: Vec<Result<bool, BatchError>> = replies
            .into_iter()
            .map(|rx| {
                rx.and_then(|rx| rx.recv().ok())
                    .unwrap_or(Err(BatchError::WorkerPanicked))
            })
            .collect();

        let statistics = batch.registry.all_statistics();
        let results: Vec<UnitResult> = batch
            .units
            .iter()
            .cloned()
            .zip(outcomes)
            .map(|(unit, outcome)| UnitResult { unit, outcome })
            .collect();
        let metrics = BatchMetrics {
            total_us: start.elapsed().as_micros() as u64,
            units_evaluated: results.len() as u64,
            units_failed: results.iter().filter(|r| r.outcome.is_err()).count() as u64,
            worker_count: self.worker_count(),
            predicate_ns: statistics
                .iter()
                .filter(|(_, s)| s.num_executions > 0)
                .map(|(name, s)| (name.clone(), s.total_ns))
                .collect(),
        };
        BatchReport {
            world: world.name().to_owned(),
            results,
            statistics,
            metrics,
        }
    }

    /// Evaluate `predicates` over every world, one batch per world.
    ///
    /// # Errors
    ///
    /// [`BatchError::Predicate`] if a predicate name is unknown; no world
    /// is evaluated in that case.
    pub fn evaluate_many(
        &self,
        worlds: &[Arc<World>],
        predicates: &[&str],
    ) -> Result<MultiWorldReport, BatchError> {
        let mut unit_lists = Vec::with_capacity(worlds.len());
        for world in worlds {
            unit_lists.push(EvaluationUnit::for_world(world, &self.registry, predicates)?);
        }
        let mut reports = Vec::with_capacity(worlds.len());
        let mut metrics = BatchMetrics::default();
        let mut statistics: Vec<(String, StatisticsSnapshot)> = self
            .registry
            .all_statistics()
            .into_iter()
            .map(|(name, _)| (name, StatisticsSnapshot::default()))
            .collect();
        for (world, units) in worlds.iter().zip(unit_lists) {
            let report = self.evaluate(world, units);
            metrics.absorb(&report.metrics);
            for ((_, total), (_, s)) in statistics.iter_mut().zip(&report.statistics) {
                *total = total.merge(s);
            }
            reports.push(report);
        }
        Ok(MultiWorldReport {
            reports,
            statistics,
            metrics,
        })
    }

    /// Stop and join the workers. Returns the number joined cleanly.
    pub fn shutdown(&mut self) -> usize {
        self.task_tx.take();
        let mut joined = 0;
        for handle in self.workers.drain(..) {
            if handle.join().is_ok() {
                joined += 1;
            }
        }
        joined
    }
}

impl Drop for PredicateManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadrule_network::RoadNetworkBuilder;

    fn empty_world() -> Arc<World> {
        let network = Arc::new(RoadNetworkBuilder::new().build().unwrap());
        Arc::new(World::new("empty", TimeStep(0), network, vec![], vec![], 0.1).unwrap())
    }

    fn manager(workers: usize) -> PredicateManager {
        PredicateManager::new(
            ManagerConfig {
                worker_count: Some(workers),
                ..ManagerConfig::default()
            },
            PredicateRegistry::with_defaults(),
            PredicateParameters::default(),
        )
        .unwrap()
    }

    #[test]
    fn spawns_requested_workers() {
        let mut m = manager(3);
        assert_eq!(m.worker_count(), 3);
        assert_eq!(m.shutdown(), 3);
        assert_eq!(m.worker_count(), 0);
    }

    #[test]
    fn unknown_obstacle_is_a_unit_failure() {
        let m = manager(2);
        let unit = EvaluationUnit {
            predicate: "in_standstill".into(),
            ego: ObstacleId(42),
            other: None,
            time_step: TimeStep(0),
        };
        let report = m.evaluate(&empty_world(), vec![unit.clone()]);
        assert_eq!(report.results.len(), 1);
        assert!(matches!(
            report.results[0].outcome,
            Err(BatchError::Evaluation { obstacle: ObstacleId(42), .. })
        ));
        assert_eq!(report.metrics.units_failed, 1);
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.results[0].unit, unit);
    }

    #[test]
    fn evaluate_after_shutdown_reports_dead_pool() {
        let mut m = manager(1);
        m.shutdown();
        let unit = EvaluationUnit {
            predicate: "in_standstill".into(),
            ego: ObstacleId(1),
            other: None,
            time_step: TimeStep(0),
        };
        let report = m.evaluate(&empty_world(), vec![unit]);
        assert_eq!(report.results[0].outcome, Err(BatchError::WorkerPanicked));
    }

    #[test]
    fn unknown_predicate_rejected_before_dispatch() {
        let m = manager(1);
        let err = m.evaluate_many(&[empty_world()], &["teleports"]).unwrap_err();
        assert!(matches!(
            err,
            BatchError::Predicate(EvaluationError::UnknownPredicate { .. })
        ));
    }

    #[test]
    fn set_parameter_validates_name() {
        let mut m = manager(1);
        m.set_parameter("standstillError", 0.5).unwrap();
        assert_eq!(m.parameters().get("standstillError").unwrap(), 0.5);
        assert!(m.set_parameter("noSuchThing", 1.0).is_err());
    }
}
