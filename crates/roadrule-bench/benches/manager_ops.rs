//! Criterion benchmarks for batch evaluation through the worker pool.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use roadrule_bench::reference_world;
use roadrule_core::PredicateParameters;
use roadrule_engine::{EvaluationUnit, ManagerConfig, PredicateManager};
use roadrule_predicate::PredicateRegistry;

const PREDICATES: &[&str] = &["safe_distance", "in_same_lane", "in_front_of", "in_standstill"];

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

/// Benchmark: evaluate every unit of the reference world (warm caches)
/// with 1, 2, and 4 workers.
fn bench_evaluate(c: &mut Criterion) {
    let world = reference_world(42, 24);
    let mut group = c.benchmark_group("evaluate_reference_world");
    for workers in [1usize, 2, 4] {
        let m = manager(workers);
        let units = EvaluationUnit::for_world(&world, m.registry(), PREDICATES).unwrap();
        // First pass fills the obstacle caches.
        m.evaluate(&world, units.clone());
        group.bench_function(format!("workers_{workers}"), |b| {
            b.iter(|| black_box(m.evaluate(&world, units.clone())));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
