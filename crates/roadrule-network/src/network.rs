//! [`RoadNetwork`] and its builder.

use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexMap;

use roadrule_core::{LaneletId, Memo};
use roadrule_geometry::{ContainmentType, Point, Polygon};

use crate::assembly;
use crate::config::RoadNetworkConfig;
use crate::error::NetworkError;
use crate::graph::LaneletGraph;
use crate::intersection::{Intersection, IntersectionId};
use crate::lane::Lane;
use crate::lanelet::Lanelet;
use crate::traffic::{TrafficLight, TrafficLightId, TrafficSign, TrafficSignId};
use crate::types::{DrivingDirection, LaneletType};

type LaneCell = Result<Arc<Lane>, NetworkError>;

// ── RoadNetworkBuilder ─────────────────────────────────────────────

/// Collects lanelets and regulatory elements, then validates them into
/// a [`RoadNetwork`].
///
/// # Examples
///
/// ```
/// use roadrule_core::LaneletId;
/// use roadrule_geometry::Point;
/// use roadrule_network::{LaneletBuilder, RoadNetworkBuilder};
///
/// let lanelet = LaneletBuilder::new(LaneletId(1))
///     .left_border(vec![Point::new(0.0, 2.0), Point::new(10.0, 2.0)])
///     .right_border(vec![Point::new(0.0, -2.0), Point::new(10.0, -2.0)])
///     .build()
///     .unwrap();
/// let network = RoadNetworkBuilder::new().lanelet(lanelet).build().unwrap();
/// assert_eq!(network.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RoadNetworkBuilder {
    lanelets: Vec<Lanelet>,
    intersections: Vec<Intersection>,
    traffic_signs: Vec<TrafficSign>,
    traffic_lights: Vec<TrafficLight>,
    config: RoadNetworkConfig,
}

impl RoadNetworkBuilder {
    /// Create an empty builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a lanelet.
    pub fn lanelet(mut self, lanelet: Lanelet) -> Self {
        self.lanelets.push(lanelet);
        self
    }

    /// Add several lanelets.
    pub fn lanelets(mut self, lanelets: impl IntoIterator<Item = Lanelet>) -> Self {
        self.lanelets.extend(lanelets);
        self
    }

    /// Add an intersection.
    pub fn intersection(mut self, intersection: Intersection) -> Self {
        self.intersections.push(intersection);
        self
    }

    /// Add a traffic sign.
    pub fn traffic_sign(mut self, sign: TrafficSign) -> Self {
        self.traffic_signs.push(sign);
        self
    }

    /// Add a traffic light.
    pub fn traffic_light(mut self, light: TrafficLight) -> Self {
        self.traffic_lights.push(light);
        self
    }

    /// Replace the configuration.
    pub fn config(mut self, config: RoadNetworkConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate references and build the network.
    ///
    /// Fails on duplicate lanelet ids, on neighbour or intersection
    /// references to missing lanelets, and on lanelets referring to
    /// unregistered signs or lights. Reciprocity of neighbour relations
    /// is not checked.
    pub fn build(self) -> Result<RoadNetwork, NetworkError> {
        let mut index = IndexMap::with_capacity(self.lanelets.len());
        for (i, lanelet) in self.lanelets.iter().enumerate() {
            if index.insert(lanelet.id(), i).is_some() {
                return Err(NetworkError::DuplicateLanelet { id: lanelet.id() });
            }
        }
        let known = |id: LaneletId| {
            if index.contains_key(&id) {
                Ok(())
            } else {
                Err(NetworkError::UnknownLanelet { id })
            }
        };

        let signs: IndexMap<TrafficSignId, TrafficSign> =
            self.traffic_signs.into_iter().map(|s| (s.id, s)).collect();
        let lights: IndexMap<TrafficLightId, TrafficLight> =
            self.traffic_lights.into_iter().map(|l| (l.id, l)).collect();

        for lanelet in &self.lanelets {
            for &id in lanelet.predecessors().iter().chain(lanelet.successors()) {
                known(id)?;
            }
            for adj in [lanelet.adjacent_left(), lanelet.adjacent_right()]
                .into_iter()
                .flatten()
            {
                known(adj.lanelet)?;
            }
            let stop_signs = lanelet.stop_line().map(|s| s.traffic_signs.as_slice());
            for sign in lanelet
                .traffic_signs()
                .iter()
                .chain(stop_signs.unwrap_or_default())
            {
                if !signs.contains_key(sign) {
                    return Err(NetworkError::UnknownRegulatoryElement {
                        lanelet: lanelet.id(),
                        kind: "traffic sign",
                        id: sign.0,
                    });
                }
            }
            let stop_lights = lanelet.stop_line().map(|s| s.traffic_lights.as_slice());
            for light in lanelet
                .traffic_lights()
                .iter()
                .chain(stop_lights.unwrap_or_default())
            {
                if !lights.contains_key(light) {
                    return Err(NetworkError::UnknownRegulatoryElement {
                        lanelet: lanelet.id(),
                        kind: "traffic light",
                        id: light.0,
                    });
                }
            }
        }

        let mut incoming = IndexMap::new();
        for intersection in &self.intersections {
            for group in &intersection.incomings {
                for id in group.all_lanelets() {
                    known(id)?;
                }
            }
            for id in intersection.incoming_lanelets() {
                incoming.entry(id).or_insert(intersection.id);
            }
        }

        let graph = LaneletGraph::new(&self.lanelets);
        Ok(RoadNetwork {
            lanelets: self.lanelets,
            index,
            graph,
            intersections: self.intersections,
            incoming,
            traffic_signs: signs,
            traffic_lights: lights,
            config: self.config,
            lanes: Memo::new(),
        })
    }
}

// ── RoadNetwork ────────────────────────────────────────────────────

/// Every lanelet, intersection, and regulatory element of one scenario.
///
/// The topology is immutable after [`RoadNetworkBuilder::build`]. Lanes
/// are assembled on demand and interned: equal lanelet sequences always
/// resolve to the same `Arc<Lane>`, whichever thread asked first.
///
/// `RoadNetwork` is `Send + Sync`; share it behind an `Arc`.
#[derive(Debug)]
pub struct RoadNetwork {
    lanelets: Vec<Lanelet>,
    index: IndexMap<LaneletId, usize>,
    graph: LaneletGraph,
    intersections: Vec<Intersection>,
    incoming: IndexMap<LaneletId, IntersectionId>,
    traffic_signs: IndexMap<TrafficSignId, TrafficSign>,
    traffic_lights: IndexMap<TrafficLightId, TrafficLight>,
    config: RoadNetworkConfig,
    lanes: Memo<Vec<LaneletId>, LaneCell>,
}

impl RoadNetwork {
    /// Number of lanelets.
    pub fn len(&self) -> usize {
        self.lanelets.len()
    }

    /// `true` if the network has no lanelets.
    pub fn is_empty(&self) -> bool {
        self.lanelets.is_empty()
    }

    /// Look up a lanelet by id.
    pub fn lanelet(&self, id: LaneletId) -> Result<&Lanelet, NetworkError> {
        self.find_lanelet(id)
            .ok_or(NetworkError::UnknownLanelet { id })
    }

    /// Look up a lanelet by id, `None` if absent.
    pub fn find_lanelet(&self, id: LaneletId) -> Option<&Lanelet> {
        self.index.get(&id).map(|&i| &self.lanelets[i])
    }

    /// All lanelets in insertion order.
    pub fn lanelets(&self) -> &[Lanelet] {
        &self.lanelets
    }

    /// The topological index.
    pub fn graph(&self) -> &LaneletGraph {
        &self.graph
    }

    /// The network configuration.
    pub fn config(&self) -> &RoadNetworkConfig {
        &self.config
    }

    /// All intersections.
    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    /// Look up a traffic sign.
    pub fn traffic_sign(&self, id: TrafficSignId) -> Option<&TrafficSign> {
        self.traffic_signs.get(&id)
    }

    /// Look up a traffic light.
    pub fn traffic_light(&self, id: TrafficLightId) -> Option<&TrafficLight> {
        self.traffic_lights.get(&id)
    }

    /// `true` if `id` leads into an intersection, either as a member of
    /// an incoming group or by carrying the [`LaneletType::Incoming`] tag.
    pub fn is_incoming(&self, id: LaneletId) -> bool {
        self.incoming.contains_key(&id)
            || self
                .find_lanelet(id)
                .is_some_and(|l| l.has_type(LaneletType::Incoming))
    }

    /// The intersection that `id` is an incoming lanelet of.
    pub fn intersection_for_incoming(&self, id: LaneletId) -> Option<&Intersection> {
        let target = *self.incoming.get(&id)?;
        self.intersections.iter().find(|i| i.id == target)
    }

    // ── Occupancy ──────────────────────────────────────────────────

    /// Ids of every lanelet overlapping `shape`, in insertion order.
    pub fn find_occupied_lanelets_by_shape(&self, shape: &Polygon) -> Vec<LaneletId> {
        self.lanelets
            .iter()
            .filter(|l| l.check_intersection(shape, ContainmentType::PartiallyContained))
            .map(Lanelet::id)
            .collect()
    }

    /// Ids of every lanelet whose polygon contains `position`.
    pub fn find_lanelets_by_position(&self, position: Point) -> Vec<LaneletId> {
        self.lanelets
            .iter()
            .filter(|l| l.bounding_box().contains(position) && l.polygon().contains_point(position))
            .map(Lanelet::id)
            .collect()
    }

    /// `id` and every lanelet reachable by repeatedly stepping left or
    /// right, sorted by id.
    ///
    /// With `same_direction` the walk stops at opposite-direction
    /// neighbours. Adjacency loops terminate the walk.
    pub fn adjacent_lanelets(
        &self,
        id: LaneletId,
        same_direction: bool,
    ) -> Result<Vec<LaneletId>, NetworkError> {
        let start = self.lanelet(id)?;
        let mut found = BTreeSet::from([id]);
        for step in [Lanelet::adjacent_left, Lanelet::adjacent_right] {
            let mut current = start;
            while let Some(adj) = step(current) {
                if same_direction && adj.direction == DrivingDirection::Opposite {
                    break;
                }
                if !found.insert(adj.lanelet) {
                    break;
                }
                current = self.lanelet(adj.lanelet)?;
            }
        }
        Ok(found.into_iter().collect())
    }

    // ── Paths ──────────────────────────────────────────────────────

    /// Lanelets on any path from `src` to `dst`, searched to the
    /// configured depth.
    pub fn lanelets_on_paths(
        &self,
        src: LaneletId,
        dst: LaneletId,
        consider_adjacency: bool,
    ) -> BTreeSet<LaneletId> {
        self.graph
            .lanelets_on_paths(src, dst, consider_adjacency, self.config.path_search_depth)
    }

    // ── Lanes ──────────────────────────────────────────────────────

    /// The lane made of exactly `sequence`, built once and shared.
    pub fn intern_lane(&self, sequence: Vec<LaneletId>) -> Result<Arc<Lane>, NetworkError> {
        self.lanes.get_or_compute(sequence.clone(), || {
            let lanelets = sequence
                .iter()
                .map(|&id| self.lanelet(id))
                .collect::<Result<Vec<_>, _>>()?;
            let lane = Lane::from_lanelets(&lanelets, &self.config)?;
            if lane.lanelet_ids() == sequence.as_slice() {
                Ok(Arc::new(lane))
            } else {
                self.intern_lane(lane.lanelet_ids().to_vec())
            }
        })
    }

    /// Lanes through each of `lanelets`, measured from `position`.
    ///
    /// For every non-border lanelet the predecessor chains within
    /// `fov_rear` are joined with the successor chains within `fov_front`.
    /// Lanes are deduplicated by sequence and lanes covered by another
    /// lane are dropped. The result keeps discovery order.
    pub fn create_lanes_by_lanelets(
        &self,
        lanelets: &[LaneletId],
        position: Point,
        fov_rear: f64,
        fov_front: f64,
    ) -> Result<Vec<Arc<Lane>>, NetworkError> {
        let mut sequences: Vec<Vec<LaneletId>> = Vec::new();
        for &id in lanelets {
            let base = self.lanelet(id)?;
            if base.has_type(LaneletType::Border) {
                continue;
            }
            for seq in assembly::lane_sequences(
                self,
                base,
                position,
                fov_rear,
                fov_front,
                self.config.max_intersections_in_lane,
            )? {
                if !sequences.contains(&seq) {
                    sequences.push(seq);
                }
            }
        }
        let mut lanes: Vec<Arc<Lane>> = Vec::with_capacity(sequences.len());
        for seq in assembly::remove_sub_sequences(sequences) {
            let lane = self.intern_lane(seq)?;
            if !lanes.iter().any(|l| Arc::ptr_eq(l, &lane)) {
                lanes.push(lane);
            }
        }
        Ok(lanes)
    }

    /// [`create_lanes_by_lanelets`](Self::create_lanes_by_lanelets) with
    /// the configured horizons.
    pub fn lanes_through(
        &self,
        lanelets: &[LaneletId],
        position: Point,
    ) -> Result<Vec<Arc<Lane>>, NetworkError> {
        self.create_lanes_by_lanelets(
            lanelets,
            position,
            self.config.lane_fov_rear,
            self.config.lane_fov_front,
        )
    }

    /// Every lane interned so far, in creation order.
    pub fn lanes(&self) -> Vec<Arc<Lane>> {
        let mut lanes: Vec<Arc<Lane>> = Vec::new();
        for lane in self.lanes.values().into_iter().filter_map(Result::ok) {
            if !lanes.iter().any(|l| Arc::ptr_eq(l, &lane)) {
                lanes.push(lane);
            }
        }
        lanes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lanelet::LaneletBuilder;
    use crate::traffic::TrafficSignId;

    fn straight(id: u64, y: f64) -> LaneletBuilder {
        LaneletBuilder::new(LaneletId(id))
            .left_border(vec![Point::new(0.0, y + 1.5), Point::new(50.0, y + 1.5)])
            .right_border(vec![Point::new(0.0, y - 1.5), Point::new(50.0, y - 1.5)])
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = RoadNetworkBuilder::new()
            .lanelet(straight(1, 0.0).build().unwrap())
            .lanelet(straight(1, 3.0).build().unwrap())
            .build()
            .unwrap_err();
        assert_eq!(err, NetworkError::DuplicateLanelet { id: LaneletId(1) });
    }

    #[test]
    fn dangling_successor_rejected() {
        let err = RoadNetworkBuilder::new()
            .lanelet(straight(1, 0.0).successor(LaneletId(9)).build().unwrap())
            .build()
            .unwrap_err();
        assert_eq!(err, NetworkError::UnknownLanelet { id: LaneletId(9) });
    }

    #[test]
    fn unknown_sign_rejected() {
        let err = RoadNetworkBuilder::new()
            .lanelet(straight(1, 0.0).traffic_sign(TrafficSignId(3)).build().unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            NetworkError::UnknownRegulatoryElement { kind: "traffic sign", id: 3, .. }
        ));
    }

    #[test]
    fn adjacency_walk_stops_at_opposite() {
        let net = RoadNetworkBuilder::new()
            .lanelet(
                straight(1, 0.0)
                    .adjacent_left(LaneletId(2), DrivingDirection::Same)
                    .build()
                    .unwrap(),
            )
            .lanelet(
                straight(2, 3.0)
                    .adjacent_right(LaneletId(1), DrivingDirection::Same)
                    .adjacent_left(LaneletId(3), DrivingDirection::Opposite)
                    .build()
                    .unwrap(),
            )
            .lanelet(straight(3, 6.0).build().unwrap())
            .build()
            .unwrap();
        assert_eq!(
            net.adjacent_lanelets(LaneletId(1), true).unwrap(),
            vec![LaneletId(1), LaneletId(2)]
        );
        assert_eq!(
            net.adjacent_lanelets(LaneletId(1), false).unwrap(),
            vec![LaneletId(1), LaneletId(2), LaneletId(3)]
        );
        assert!(net.adjacent_lanelets(LaneletId(7), true).is_err());
    }

    #[test]
    fn lanes_are_interned() {
        let net = RoadNetworkBuilder::new()
            .lanelet(straight(1, 0.0).build().unwrap())
            .build()
            .unwrap();
        let a = net.intern_lane(vec![LaneletId(1)]).unwrap();
        let b = net
            .lanes_through(&[LaneletId(1)], Point::new(10.0, 0.0))
            .unwrap();
        assert_eq!(b.len(), 1);
        assert!(Arc::ptr_eq(&a, &b[0]));
        assert_eq!(net.lanes().len(), 1);
    }

    #[test]
    fn occupancy_by_shape_and_position() {
        let net = RoadNetworkBuilder::new()
            .lanelet(straight(1, 0.0).build().unwrap())
            .lanelet(straight(2, 3.0).build().unwrap())
            .build()
            .unwrap();
        let on_seam = Polygon::new([
            Point::new(10.0, 1.0),
            Point::new(14.0, 1.0),
            Point::new(14.0, 2.0),
            Point::new(10.0, 2.0),
        ])
        .unwrap();
        assert_eq!(
            net.find_occupied_lanelets_by_shape(&on_seam),
            vec![LaneletId(1), LaneletId(2)]
        );
        assert_eq!(
            net.find_lanelets_by_position(Point::new(5.0, 3.5)),
            vec![LaneletId(2)]
        );
    }
}
