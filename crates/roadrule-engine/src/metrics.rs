//! Per-batch performance metrics.
//!
//! [`BatchMetrics`] captures timing and volume for one
//! [`PredicateManager::evaluate`](crate::PredicateManager::evaluate) call.

/// Timing and volume metrics collected during one batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchMetrics {
    /// Wall-clock time for the entire batch, in microseconds.
    pub total_us: u64,
    /// Number of units dispatched.
    pub units_evaluated: u64,
    /// Number of units whose outcome is an error.
    pub units_failed: u64,
    /// Number of worker threads that served the batch.
    pub worker_count: usize,
    /// Per-predicate summed evaluation time: `(name, nanoseconds)`.
    pub predicate_ns: Vec<(String, u64)>,
}

impl BatchMetrics {
    /// Accumulate `other` into `self`. Predicate times are summed by name;
    /// names new to `self` are appended.
    pub fn absorb(&mut self, other: &BatchMetrics) {
        self.total_us += other.total_us;
        self.units_evaluated += other.units_evaluated;
        self.units_failed += other.units_failed;
        self.worker_count = self.worker_count.max(other.worker_count);
        for (name, ns) in &other.predicate_ns {
            match self.predicate_ns.iter_mut().find(|(n, _)| n == name) {
                Some((_, total)) => *total += ns,
                None => self.predicate_ns.push((name.clone(), *ns)),
            }
        }
    }
}
