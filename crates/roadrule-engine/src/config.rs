//! Manager configuration and construction errors.

use std::error::Error;
use std::fmt;

use roadrule_core::ObstacleId;

// ── ManagerConfig ──────────────────────────────────────────────────

/// Configuration for [`PredicateManager`](crate::PredicateManager).
#[derive(Clone, Debug)]
pub struct ManagerConfig {
    /// Number of worker threads. `None` = auto-detect
    /// (`available_parallelism / 2`, clamped to `[2, 16]`).
    pub worker_count: Option<usize>,
    /// Task queue slots per worker. Default: 4.
    pub queue_depth_per_worker: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            queue_depth_per_worker: 4,
        }
    }
}

impl ManagerConfig {
    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4);
                (cpus / 2).clamp(2, 16)
            }
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_depth_per_worker == 0 {
            return Err(ConfigError::QueueDepthZero);
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors building a [`World`](crate::World) or a manager.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The time-step size is NaN, infinite, zero, or negative.
    InvalidTimeStepSize {
        /// The invalid value.
        value: f64,
    },
    /// Two obstacles of one world share an id.
    DuplicateObstacle {
        /// The repeated id.
        id: ObstacleId,
    },
    /// `queue_depth_per_worker` is zero.
    QueueDepthZero,
    /// A worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimeStepSize { value } => {
                write!(f, "time-step size must be finite and positive, got {value}")
            }
            Self::DuplicateObstacle { id } => write!(f, "duplicate obstacle id {id}"),
            Self::QueueDepthZero => write!(f, "queue_depth_per_worker must be at least 1"),
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "thread spawn failed: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_worker_count_is_clamped() {
        let cfg = |n| ManagerConfig {
            worker_count: Some(n),
            ..ManagerConfig::default()
        };
        assert_eq!(cfg(0).resolved_worker_count(), 1);
        assert_eq!(cfg(8).resolved_worker_count(), 8);
        assert_eq!(cfg(1000).resolved_worker_count(), 64);
    }

    #[test]
    fn auto_worker_count_in_range() {
        let n = ManagerConfig::default().resolved_worker_count();
        assert!((2..=16).contains(&n));
    }

    #[test]
    fn zero_queue_depth_rejected() {
        let cfg = ManagerConfig {
            queue_depth_per_worker: 0,
            ..ManagerConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::QueueDepthZero));
        assert!(ManagerConfig::default().validate().is_ok());
    }
}
