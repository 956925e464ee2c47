//! Benchmark profiles for roadrule.
//!
//! - [`reference_world`]: 3-lane, 1 km highway with 1 ego and 24 other
//!   vehicles over 20 time steps
//! - [`vehicle_positions`]: deterministic vehicle placement via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use roadrule_core::TimeStep;
use roadrule_engine::World;
use roadrule_test_utils::fixtures::{highway, LANE_WIDTH};
use roadrule_test_utils::VehicleBuilder;

/// Lanes of the reference highway.
pub const LANES: u64 = 3;
/// 50 m segments per lane of the reference highway.
pub const SEGMENTS: u64 = 20;
/// Time steps per vehicle.
pub const STEPS: u64 = 20;
/// Seconds per time step.
pub const DT: f64 = 0.1;

/// Build the reference benchmark world.
///
/// The ego (id 0) drives at 25 m/s in the middle lane from x = 100.
/// `others` vehicles (ids 1..) are placed by [`vehicle_positions`]
/// within 400 m ahead of the ego, at 15 to 30 m/s.
pub fn reference_world(seed: u64, others: usize) -> Arc<World> {
    let ego = VehicleBuilder::new(0)
        .at(100.0, LANE_WIDTH)
        .velocity(25.0)
        .steps(STEPS, DT)
        .build();
    let obstacles = vehicle_positions(others, seed)
        .into_iter()
        .enumerate()
        .map(|(i, (x, lane, v))| {
            VehicleBuilder::new(i as u64 + 1)
                .at(x, LANE_WIDTH * lane as f64)
                .velocity(v)
                .steps(STEPS, DT)
                .build()
        })
        .collect();
    let world = World::new(
        format!("reference-{seed}"),
        TimeStep(0),
        Arc::new(highway(LANES, SEGMENTS)),
        vec![ego],
        obstacles,
        DT,
    )
    .unwrap();
    Arc::new(world)
}

/// Deterministic `(x, lane, velocity)` triples for `count` vehicles.
///
/// Vehicles in one lane are at least 10 m apart.
pub fn vehicle_positions(count: usize, seed: u64) -> Vec<(f64, u64, f64)> {
    let mut out: Vec<(f64, u64, f64)> = Vec::with_capacity(count);
    let mut i = seed;
    while out.len() < count {
        i = i.wrapping_add(1);
        let lane = i.wrapping_mul(6364136223846793007) % LANES;
        let x = 120.0 + (i.wrapping_mul(1442695040888963407) % 400) as f64;
        let v = 15.0 + (i.wrapping_mul(2862933555777941757) % 16) as f64;
        if out.iter().all(|&(ox, ol, _)| ol != lane || (ox - x).abs() >= 10.0) {
            out.push((x, lane, v));
        }
    }
    out
}
