//! Scenario worlds and batch predicate evaluation for roadrule.
//!
//! A [`World`] bundles one scenario: its road network, ego obstacles,
//! other obstacles, and time-step size. A [`PredicateManager`] owns a
//! pool of worker threads and evaluates [`EvaluationUnit`]s (one
//! predicate, one ego, optionally one other obstacle, one time step)
//! against a world.
//!
//! ```text
//! Caller                                   Workers (N)
//!     |                                        |
//!     |--evaluate(world, units)                |
//!     |   [task_tx: bounded(N*depth)]  task_rx.recv()
//!     |                                registry.boolean(..)
//!     |<--outcome via reply: bounded(1)--------|
//!     |   collected in unit order              |
//! ```
//!
//! Every evaluation call forks the manager's registry, so the statistics
//! in a [`BatchReport`] cover exactly one world.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod manager;
pub mod metrics;
pub mod world;

pub use config::{ConfigError, ManagerConfig};
pub use error::BatchError;
pub use manager::{BatchReport, EvaluationUnit, MultiWorldReport, PredicateManager, UnitResult};
pub use metrics::BatchMetrics;
pub use world::World;
