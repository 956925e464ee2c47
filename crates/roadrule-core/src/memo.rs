//! Keyed at-most-once memoization.
//!
//! [`Memo`] maps each key to a single-assignment cell. The map lock is
//! held only long enough to find or insert the cell; the value itself is
//! computed outside the lock, so computing one key may read other keys
//! of the same memo. Concurrent first access to the same key blocks the
//! later caller until the first one has stored its value.
//!
//! Entries are never invalidated. Errors are ordinary values here: a
//! memo of `Result<T, E>` caches failures as well as successes.

use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use indexmap::IndexMap;

/// Thread-safe memo table with at-most-once evaluation per key.
///
/// # Examples
///
/// ```
/// use roadrule_core::Memo;
///
/// let memo: Memo<u32, u64> = Memo::new();
/// let mut calls = 0;
/// let a = memo.get_or_compute(7, || { calls += 1; 49 });
/// let b = memo.get_or_compute(7, || { calls += 1; 0 });
/// assert_eq!((a, b, calls), (49, 49, 1));
/// ```
pub struct Memo<K, V> {
    cells: Mutex<IndexMap<K, Arc<OnceLock<V>>>>,
}

impl<K: Hash + Eq, V: Clone> Memo<K, V> {
    /// Create an empty memo.
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(IndexMap::new()),
        }
    }

    /// Return the value for `key`, running `compute` if no value exists yet.
    ///
    /// `compute` runs at most once per key over the life of the memo.
    /// It must not request the same key again.
    pub fn get_or_compute(&self, key: K, compute: impl FnOnce() -> V) -> V {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cells.entry(key).or_default())
        };
        cell.get_or_init(compute).clone()
    }

    /// The stored value for `key`, if it has been computed.
    pub fn get(&self, key: &K) -> Option<V> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.get(key).and_then(|c| c.get().cloned())
    }

    /// Number of keys with a computed value.
    pub fn len(&self) -> usize {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.values().filter(|c| c.get().is_some()).count()
    }

    /// `true` if no value has been computed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All computed values in first-request order.
    pub fn values(&self) -> Vec<V> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.values().filter_map(|c| c.get().cloned()).collect()
    }
}

impl<K: Hash + Eq, V: Clone> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for Memo<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self
            .cells
            .lock()
            .map(|c| c.len())
            .unwrap_or_else(|p| p.into_inner().len());
        f.debug_struct("Memo").field("keys", &len).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn computes_once_per_key() {
        let memo: Memo<&str, usize> = Memo::new();
        assert!(memo.is_empty());
        assert_eq!(memo.get_or_compute("a", || 1), 1);
        assert_eq!(memo.get_or_compute("a", || 2), 1);
        assert_eq!(memo.get_or_compute("b", || 3), 3);
        assert_eq!(memo.len(), 2);
        assert_eq!(memo.get(&"b"), Some(3));
        assert_eq!(memo.get(&"c"), None);
        assert_eq!(memo.values(), vec![1, 3]);
    }

    #[test]
    fn errors_are_cached() {
        let memo: Memo<u8, Result<u8, String>> = Memo::new();
        assert!(memo.get_or_compute(1, || Err("boom".into())).is_err());
        assert!(memo.get_or_compute(1, || Ok(5)).is_err());
    }

    #[test]
    fn nested_keys_do_not_deadlock() {
        let memo: Memo<u32, u32> = Memo::new();
        let v = memo.get_or_compute(2, || memo.get_or_compute(1, || 10) + 1);
        assert_eq!(v, 11);
    }

    #[test]
    fn concurrent_first_access_runs_once() {
        let memo = Arc::new(Memo::<u32, u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let memo = Arc::clone(&memo);
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    memo.get_or_compute(42, || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(std::time::Duration::from_millis(5));
                        7
                    })
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
