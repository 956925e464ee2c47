//! Occupancy, reference-lane resolution, and curvilinear extents.

use std::collections::BTreeSet;
use std::f64::consts::FRAC_PI_4;
use std::fmt::Write as _;
use std::sync::Arc;

use roadrule_core::{LaneletId, TimeStep};
use roadrule_geometry::{wrap_angle, Point, Shape};
use roadrule_network::{Lane, RoadNetwork};

use crate::cache::{Lanelets, Lanes};
use crate::error::ObstacleError;
use crate::obstacle::Obstacle;

/// Position and heading of an obstacle in a lane's curvilinear frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvilinearState {
    /// Longitudinal coordinate of the shape's center.
    pub s: f64,
    /// Lateral coordinate of the shape's center, positive to the left.
    pub d: f64,
    /// Heading relative to the reference path tangent, in `[-π, π]`.
    pub theta: f64,
}

// ── Occupancy ──────────────────────────────────────────────────────

impl Obstacle {
    /// Lanelets overlapped by the shape at `time_step`.
    pub fn occupied_lanelets_by_shape(
        &self,
        network: &RoadNetwork,
        time_step: TimeStep,
    ) -> Lanelets {
        self.caches.by_shape.get_or_compute(time_step, || {
            let polygon = self.occupancy_polygon(time_step)?;
            Ok(network.find_occupied_lanelets_by_shape(&polygon).into())
        })
    }

    /// Occupied lanelets whose direction at the obstacle's position is
    /// within π/4 of its heading.
    fn heading_aligned_lanelets(&self, network: &RoadNetwork, time_step: TimeStep) -> Lanelets {
        self.caches.heading_aligned.get_or_compute(time_step, || {
            let state = self.state_at(time_step)?;
            let occupied = self.occupied_lanelets_by_shape(network, time_step)?;
            let mut aligned = Vec::with_capacity(occupied.len());
            for &id in occupied.iter() {
                let lanelet = network.lanelet(id)?;
                let delta = wrap_angle(lanelet.orientation_at(state.position) - state.orientation);
                if delta.abs() < FRAC_PI_4 {
                    aligned.push(id);
                }
            }
            Ok(aligned.into())
        })
    }

    /// Occupied lanelets in the obstacle's driving direction.
    ///
    /// Starts from the heading-aligned lanelets at `time_step` and keeps
    /// those lying on an adjacency-aware path from the aligned lanelets of
    /// the first time step to those of the final time step. When no such
    /// path exists the heading-aligned set is returned unrestricted.
    pub fn occupied_lanelets_driving_direction(
        &self,
        network: &RoadNetwork,
        time_step: TimeStep,
    ) -> Lanelets {
        self.caches.driving_direction.get_or_compute(time_step, || {
            let aligned = self.heading_aligned_lanelets(network, time_step)?;
            let start = self.heading_aligned_lanelets(network, self.first_time_step())?;
            let end = self.heading_aligned_lanelets(network, self.final_time_step())?;
            let mut on_paths = BTreeSet::new();
            for &src in start.iter() {
                for &dst in end.iter() {
                    on_paths.extend(network.lanelets_on_paths(src, dst, true));
                }
            }
            let restricted: Vec<LaneletId> = aligned
                .iter()
                .copied()
                .filter(|id| on_paths.contains(id))
                .collect();
            if restricted.is_empty() {
                Ok(aligned)
            } else {
                Ok(restricted.into())
            }
        })
    }

    /// Lanes through the lanelets occupied in driving direction at
    /// `time_step`, within the obstacle's sensor range.
    pub fn occupied_lanes(&self, network: &RoadNetwork, time_step: TimeStep) -> Lanes {
        self.caches.lanes.get_or_compute(time_step, || {
            let lanelets = self.occupied_lanelets_driving_direction(network, time_step)?;
            self.lanes_through(network, &lanelets, time_step)
        })
    }

    fn lanes_through(
        &self,
        network: &RoadNetwork,
        lanelets: &[LaneletId],
        time_step: TimeStep,
    ) -> Lanes {
        let position = self.state_at(time_step)?.position;
        let lanes = network.create_lanes_by_lanelets(
            lanelets,
            position,
            self.sensor().field_of_view_rear(),
            self.sensor().field_of_view_front(),
        )?;
        Ok(lanes.into())
    }

    // ── Reference lane ─────────────────────────────────────────────

    /// The lane used as coordinate basis at `time_step`.
    ///
    /// Candidates are the lanes through the driving-direction lanelets
    /// (or, if there are none, all overlapped lanelets) and their
    /// same-direction neighbours. Lanes containing lanelets occupied at
    /// both the first and the final time step are preferred, then lanes
    /// containing lanelets of the final time step. Remaining ties go to
    /// the lane overlapped at the most time steps from `time_step` to
    /// the final one, then to the lowest lane id, then to the
    /// lexicographically smallest lanelet sequence.
    ///
    /// Without candidates a second pass uses the neighbours in either
    /// direction of the overlapped lanelets. If that also fails the
    /// result is [`ObstacleError::NoReferenceLane`].
    pub fn reference_lane(
        &self,
        network: &RoadNetwork,
        time_step: TimeStep,
    ) -> Result<Arc<Lane>, ObstacleError> {
        self.caches
            .reference_lane
            .get_or_compute(time_step, || self.compute_reference_lane(network, time_step))
    }

    fn compute_reference_lane(
        &self,
        network: &RoadNetwork,
        time_step: TimeStep,
    ) -> Result<Arc<Lane>, ObstacleError> {
        let by_shape = self.occupied_lanelets_by_shape(network, time_step)?;
        let mut seeds = self.occupied_lanelets_driving_direction(network, time_step)?;
        if seeds.is_empty() {
            seeds = Arc::clone(&by_shape);
        }
        let first = self.occupied_lanelets_driving_direction(network, self.first_time_step())?;
        let last = self.occupied_lanelets_driving_direction(network, self.final_time_step())?;

        let neighbours = with_neighbours(network, &seeds, true)?;
        let candidates = self.lanes_through(network, &neighbours, time_step)?;
        if let Some(lane) = self.select_lane(network, &candidates, &first, &last, time_step)? {
            return Ok(lane);
        }

        let neighbours = with_neighbours(network, &by_shape, false)?;
        let fallback = self.lanes_through(network, &neighbours, time_step)?;
        self.select_lane(network, &fallback, &first, &last, time_step)?
            .ok_or(ObstacleError::NoReferenceLane {
                obstacle: self.id(),
                time_step,
            })
    }

    fn select_lane(
        &self,
        network: &RoadNetwork,
        candidates: &[Arc<Lane>],
        first: &[LaneletId],
        last: &[LaneletId],
        time_step: TimeStep,
    ) -> Result<Option<Arc<Lane>>, ObstacleError> {
        let both: Vec<&Arc<Lane>> = candidates
            .iter()
            .filter(|l| touches(l, first) && touches(l, last))
            .collect();
        let pool = if !both.is_empty() {
            both
        } else {
            let ending: Vec<&Arc<Lane>> = candidates.iter().filter(|l| touches(l, last)).collect();
            if ending.is_empty() {
                candidates.iter().collect()
            } else {
                ending
            }
        };
        if pool.len() <= 1 {
            return Ok(pool.first().map(|l| Arc::clone(l)));
        }

        let mut counts = vec![0usize; pool.len()];
        if time_step <= self.final_time_step() {
            for step in time_step.through(self.final_time_step()) {
                let occupied = self.occupied_lanelets_by_shape(network, step)?;
                for (count, lane) in counts.iter_mut().zip(&pool) {
                    if touches(lane, &occupied) {
                        *count += 1;
                    }
                }
            }
        }
        let best = pool
            .iter()
            .zip(&counts)
            .min_by(|(a, ca), (b, cb)| {
                cb.cmp(ca)
                    .then(a.id().cmp(&b.id()))
                    .then_with(|| a.lanelet_ids().cmp(b.lanelet_ids()))
            })
            .map(|(lane, _)| Arc::clone(lane));
        Ok(best)
    }

    // ── Curvilinear state ──────────────────────────────────────────

    /// Curvilinear position and orientation at `time_step` in `lane`.
    pub fn curvilinear_state(
        &self,
        time_step: TimeStep,
        lane: &Lane,
    ) -> Result<CurvilinearState, ObstacleError> {
        let key = (time_step, lane.lanelet_ids().to_vec());
        self.caches.curvilinear.get_or_compute(key, || {
            let state = self.state_at(time_step)?;
            let Point { x, y } = state.position;
            let ccs = lane.ccs();
            let (s, d) = ccs
                .to_curvilinear(x, y)
                .map_err(|source| ObstacleError::Projection {
                    obstacle: self.id(),
                    time_step,
                    x,
                    y,
                    reference_path: dump_path(ccs.reference_path()),
                    source,
                })?;
            let theta = wrap_angle(state.orientation - ccs.orientation_at(s));
            Ok(CurvilinearState { s, d, theta })
        })
    }

    /// Curvilinear state on the reference lane of `time_step`.
    pub fn reference_state(
        &self,
        network: &RoadNetwork,
        time_step: TimeStep,
    ) -> Result<CurvilinearState, ObstacleError> {
        let lane = self.reference_lane(network, time_step)?;
        self.curvilinear_state(time_step, &lane)
    }

    /// Longitudinal position on the reference lane.
    pub fn lon_position(
        &self,
        network: &RoadNetwork,
        time_step: TimeStep,
    ) -> Result<f64, ObstacleError> {
        Ok(self.reference_state(network, time_step)?.s)
    }

    /// Lateral position on the reference lane.
    pub fn lat_position(
        &self,
        network: &RoadNetwork,
        time_step: TimeStep,
    ) -> Result<f64, ObstacleError> {
        Ok(self.reference_state(network, time_step)?.d)
    }

    /// Heading relative to the reference lane.
    pub fn curvilinear_orientation(
        &self,
        network: &RoadNetwork,
        time_step: TimeStep,
    ) -> Result<f64, ObstacleError> {
        Ok(self.reference_state(network, time_step)?.theta)
    }

    /// Half extents `(longitudinal, lateral)` of the shape at curvilinear
    /// heading `theta`. Rectangles use the projections of their rotated
    /// corners; circles are heading-independent.
    fn half_extents(&self, theta: f64) -> (f64, f64) {
        match *self.shape() {
            Shape::Circle { radius } => (radius, radius),
            Shape::Rectangle { length, width } => {
                let (hl, hw) = (0.5 * length, 0.5 * width);
                let (sin, cos) = theta.sin_cos();
                (
                    hl * cos.abs() + hw * sin.abs(),
                    hl * sin.abs() + hw * cos.abs(),
                )
            }
        }
    }

    /// Frontmost longitudinal coordinate of the shape in `lane`.
    pub fn front_s_on(&self, time_step: TimeStep, lane: &Lane) -> Result<f64, ObstacleError> {
        let c = self.curvilinear_state(time_step, lane)?;
        Ok(c.s + self.half_extents(c.theta).0)
    }

    /// Rearmost longitudinal coordinate of the shape in `lane`.
    pub fn rear_s_on(&self, time_step: TimeStep, lane: &Lane) -> Result<f64, ObstacleError> {
        let c = self.curvilinear_state(time_step, lane)?;
        Ok(c.s - self.half_extents(c.theta).0)
    }

    /// Leftmost lateral coordinate of the shape in `lane`.
    pub fn left_d_on(&self, time_step: TimeStep, lane: &Lane) -> Result<f64, ObstacleError> {
        let c = self.curvilinear_state(time_step, lane)?;
        Ok(c.d + self.half_extents(c.theta).1)
    }

    /// Rightmost lateral coordinate of the shape in `lane`.
    pub fn right_d_on(&self, time_step: TimeStep, lane: &Lane) -> Result<f64, ObstacleError> {
        let c = self.curvilinear_state(time_step, lane)?;
        Ok(c.d - self.half_extents(c.theta).1)
    }

    /// Frontmost longitudinal coordinate on the reference lane.
    pub fn front_s(
        &self,
        network: &RoadNetwork,
        time_step: TimeStep,
    ) -> Result<f64, ObstacleError> {
        let lane = self.reference_lane(network, time_step)?;
        self.front_s_on(time_step, &lane)
    }

    /// Rearmost longitudinal coordinate on the reference lane.
    pub fn rear_s(&self, network: &RoadNetwork, time_step: TimeStep) -> Result<f64, ObstacleError> {
        let lane = self.reference_lane(network, time_step)?;
        self.rear_s_on(time_step, &lane)
    }

    /// Leftmost lateral coordinate on the reference lane.
    pub fn left_d(&self, network: &RoadNetwork, time_step: TimeStep) -> Result<f64, ObstacleError> {
        let lane = self.reference_lane(network, time_step)?;
        self.left_d_on(time_step, &lane)
    }

    /// Rightmost lateral coordinate on the reference lane.
    pub fn right_d(
        &self,
        network: &RoadNetwork,
        time_step: TimeStep,
    ) -> Result<f64, ObstacleError> {
        let lane = self.reference_lane(network, time_step)?;
        self.right_d_on(time_step, &lane)
    }

    /// Lateral gap to `other`, both measured on this obstacle's reference
    /// lane.
    pub fn lateral_distance_to(
        &self,
        other: &Obstacle,
        network: &RoadNetwork,
        time_step: TimeStep,
    ) -> Result<f64, ObstacleError> {
        let lane = self.reference_lane(network, time_step)?;
        let right = self.right_d_on(time_step, &lane)?;
        let left = self.left_d_on(time_step, &lane)?;
        let other_right = other.right_d_on(time_step, &lane)?;
        let other_left = other.left_d_on(time_step, &lane)?;
        Ok((right - other_left).abs().min((left - other_right).abs()))
    }
}

fn touches(lane: &Lane, ids: &[LaneletId]) -> bool {
    ids.iter().any(|&id| lane.contains_lanelet(id))
}

/// `ids` plus their adjacent lanelets, deduplicated in first-seen order.
fn with_neighbours(
    network: &RoadNetwork,
    ids: &[LaneletId],
    same_direction: bool,
) -> Result<Vec<LaneletId>, ObstacleError> {
    let mut out: Vec<LaneletId> = Vec::new();
    for &id in ids {
        for adj in network.adjacent_lanelets(id, same_direction)? {
            if !out.contains(&adj) {
                out.push(adj);
            }
        }
    }
    Ok(out)
}

fn dump_path(path: &[Point]) -> String {
    let mut out = String::new();
    for p in path {
        let _ = writeln!(out, "({}, {})", p.x, p.y);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::{ObstacleBuilder, ObstacleRole};
    use crate::state::State;
    use roadrule_core::ObstacleId;
    use roadrule_network::{DrivingDirection, LaneletBuilder, RoadNetworkBuilder};

    fn lanelet(id: u64, y: f64) -> LaneletBuilder {
        LaneletBuilder::new(LaneletId(id))
            .left_border(vec![Point::new(0.0, y + 2.0), Point::new(100.0, y + 2.0)])
            .right_border(vec![Point::new(0.0, y - 2.0), Point::new(100.0, y - 2.0)])
    }

    /// Lanelet 1 centered on y = 0, lanelet 2 on y = 4, same direction.
    fn two_lanes() -> RoadNetwork {
        RoadNetworkBuilder::new()
            .lanelet(
                lanelet(1, 0.0)
                    .adjacent_left(LaneletId(2), DrivingDirection::Same)
                    .build()
                    .unwrap(),
            )
            .lanelet(
                lanelet(2, 4.0)
                    .adjacent_right(LaneletId(1), DrivingDirection::Same)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    fn car(x: f64, y: f64, orientation: f64) -> Obstacle {
        ObstacleBuilder::new(ObstacleId(1), ObstacleRole::Dynamic)
            .shape(Shape::rectangle(4.0, 1.8).unwrap())
            .current_state(State {
                time_step: TimeStep(0),
                position: Point::new(x, y),
                velocity: 10.0,
                acceleration: 0.0,
                orientation,
            })
            .build()
            .unwrap()
    }

    #[test]
    fn reference_lane_follows_occupancy() {
        let net = two_lanes();
        let o = car(50.0, 4.0, 0.0);
        let lane = o.reference_lane(&net, TimeStep(0)).unwrap();
        assert_eq!(lane.lanelet_ids(), &[LaneletId(2)]);
        let again = o.reference_lane(&net, TimeStep(0)).unwrap();
        assert!(Arc::ptr_eq(&lane, &again));
    }

    #[test]
    fn straddling_tie_goes_to_lowest_lane_id() {
        let net = two_lanes();
        let o = car(50.0, 2.0, 0.0);
        assert_eq!(
            &*o.occupied_lanelets_by_shape(&net, TimeStep(0)).unwrap(),
            &[LaneletId(1), LaneletId(2)]
        );
        let lane = o.reference_lane(&net, TimeStep(0)).unwrap();
        assert_eq!(lane.lanelet_ids(), &[LaneletId(1)]);
    }

    #[test]
    fn wrong_way_heading_is_not_driving_direction() {
        let net = two_lanes();
        let o = car(50.0, 0.0, std::f64::consts::PI);
        assert!(o
            .occupied_lanelets_driving_direction(&net, TimeStep(0))
            .unwrap()
            .is_empty());
        // The overlapped lanelet still yields a reference lane.
        assert!(o.reference_lane(&net, TimeStep(0)).is_ok());
    }

    #[test]
    fn extents_of_aligned_rectangle() {
        let net = two_lanes();
        let o = car(50.0, 0.5, 0.0);
        let t = TimeStep(0);
        assert!((o.lon_position(&net, t).unwrap() - 50.0).abs() < 1e-9);
        assert!((o.lat_position(&net, t).unwrap() - 0.5).abs() < 1e-9);
        assert!((o.front_s(&net, t).unwrap() - 52.0).abs() < 1e-9);
        assert!((o.rear_s(&net, t).unwrap() - 48.0).abs() < 1e-9);
        assert!((o.left_d(&net, t).unwrap() - 1.4).abs() < 1e-9);
        assert!((o.right_d(&net, t).unwrap() + 0.4).abs() < 1e-9);
    }

    #[test]
    fn extents_of_rotated_rectangle() {
        let net = two_lanes();
        let o = car(50.0, 0.0, std::f64::consts::FRAC_PI_2);
        let lane = net.intern_lane(vec![LaneletId(1)]).unwrap();
        let t = TimeStep(0);
        assert!((o.front_s_on(t, &lane).unwrap() - 50.9).abs() < 1e-9);
        assert!((o.rear_s_on(t, &lane).unwrap() - 49.1).abs() < 1e-9);
        assert!((o.left_d_on(t, &lane).unwrap() - 2.0).abs() < 1e-9);
        assert!((o.right_d_on(t, &lane).unwrap() + 2.0).abs() < 1e-9);
    }

    #[test]
    fn circle_extents_ignore_heading() {
        let net = two_lanes();
        let lane = net.intern_lane(vec![LaneletId(1)]).unwrap();
        let t = TimeStep(0);
        for heading in [0.0, std::f64::consts::FRAC_PI_4, 2.0] {
            let o = ObstacleBuilder::new(ObstacleId(4), ObstacleRole::Dynamic)
                .shape(Shape::circle(1.0).unwrap())
                .current_state(State::at_rest(t, Point::new(50.0, 0.0), heading))
                .build()
                .unwrap();
            assert!((o.front_s_on(t, &lane).unwrap() - 51.0).abs() < 1e-9, "{heading}");
            assert!((o.rear_s_on(t, &lane).unwrap() - 49.0).abs() < 1e-9, "{heading}");
            assert!((o.left_d_on(t, &lane).unwrap() - 1.0).abs() < 1e-9, "{heading}");
            assert!((o.right_d_on(t, &lane).unwrap() + 1.0).abs() < 1e-9, "{heading}");
        }
    }

    #[test]
    fn projection_error_is_annotated() {
        let net = two_lanes();
        let o = car(50.0, 60.0, 0.0);
        let lane = net.intern_lane(vec![LaneletId(1)]).unwrap();
        match o.curvilinear_state(TimeStep(0), &lane).unwrap_err() {
            ObstacleError::Projection {
                obstacle,
                reference_path,
                ..
            } => {
                assert_eq!(obstacle, ObstacleId(1));
                assert!(reference_path.contains("(100, 0)"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn lateral_gap_between_neighbours() {
        let net = two_lanes();
        let a = car(50.0, 0.0, 0.0);
        let b = ObstacleBuilder::new(ObstacleId(2), ObstacleRole::Dynamic)
            .shape(Shape::rectangle(4.0, 1.8).unwrap())
            .current_state(State::at_rest(TimeStep(0), Point::new(50.0, 4.0), 0.0))
            .build()
            .unwrap();
        let gap = a.lateral_distance_to(&b, &net, TimeStep(0)).unwrap();
        assert!((gap - 2.2).abs() < 1e-9);
    }
}
