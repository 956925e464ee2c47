//! The [`Lanelet`]: an atomic directed road segment.
//!
//! Lanelets are assembled through [`LaneletBuilder`]. Border vertices are
//! appended one at a time or in bulk; [`LaneletBuilder::build`] validates
//! the borders and derives the center line, the outer polygon, and the
//! per-vertex path length once. Topology (predecessors, successors,
//! adjacency) is stored as ids; keeping those references mutual is the
//! caller's job.

use std::collections::BTreeSet;

use smallvec::SmallVec;

use roadrule_core::LaneletId;
use roadrule_geometry::{BoundingBox, ContainmentType, Point, Polygon};

use crate::error::NetworkError;
use crate::traffic::{StopLine, TrafficLightId, TrafficSignId};
use crate::types::{DrivingDirection, LaneletType, LineMarking, RoadUser};

/// Left or right neighbour of a lanelet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Adjacency {
    /// The neighbouring lanelet.
    pub lanelet: LaneletId,
    /// Its driving direction relative to this lanelet.
    pub direction: DrivingDirection,
}

/// Directed road segment bounded by a left and a right border.
#[derive(Clone, Debug)]
pub struct Lanelet {
    id: LaneletId,
    left: Vec<Point>,
    right: Vec<Point>,
    center: Vec<Point>,
    path_length: Vec<f64>,
    polygon: Polygon,
    predecessors: SmallVec<[LaneletId; 2]>,
    successors: SmallVec<[LaneletId; 2]>,
    adjacent_left: Option<Adjacency>,
    adjacent_right: Option<Adjacency>,
    types: BTreeSet<LaneletType>,
    users_one_way: BTreeSet<RoadUser>,
    users_bidirectional: BTreeSet<RoadUser>,
    line_marking_left: LineMarking,
    line_marking_right: LineMarking,
    traffic_signs: Vec<TrafficSignId>,
    traffic_lights: Vec<TrafficLightId>,
    stop_line: Option<StopLine>,
}

impl Lanelet {
    /// Shorthand for a lanelet with borders only.
    pub fn new(id: LaneletId, left: Vec<Point>, right: Vec<Point>) -> Result<Self, NetworkError> {
        LaneletBuilder::new(id)
            .left_border(left)
            .right_border(right)
            .build()
    }

    /// Unique id.
    pub fn id(&self) -> LaneletId {
        self.id
    }

    /// Left border, in driving direction.
    pub fn left_border(&self) -> &[Point] {
        &self.left
    }

    /// Right border, in driving direction.
    pub fn right_border(&self) -> &[Point] {
        &self.right
    }

    /// Center line: element-wise midpoint of the borders.
    pub fn center_line(&self) -> &[Point] {
        &self.center
    }

    /// Cumulative center-line arclength at each center vertex.
    pub fn path_length(&self) -> &[f64] {
        &self.path_length
    }

    /// Total center-line length.
    pub fn length(&self) -> f64 {
        self.path_length.last().copied().unwrap_or(0.0)
    }

    /// Outer polygon.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Bounding box of the outer polygon.
    pub fn bounding_box(&self) -> &BoundingBox {
        self.polygon.bounding_box()
    }

    /// Predecessor ids.
    pub fn predecessors(&self) -> &[LaneletId] {
        &self.predecessors
    }

    /// Successor ids.
    pub fn successors(&self) -> &[LaneletId] {
        &self.successors
    }

    /// Left neighbour, if any.
    pub fn adjacent_left(&self) -> Option<Adjacency> {
        self.adjacent_left
    }

    /// Right neighbour, if any.
    pub fn adjacent_right(&self) -> Option<Adjacency> {
        self.adjacent_right
    }

    /// Type tags.
    pub fn types(&self) -> &BTreeSet<LaneletType> {
        &self.types
    }

    /// `true` if the lanelet carries `ty`.
    pub fn has_type(&self, ty: LaneletType) -> bool {
        self.types.contains(&ty)
    }

    /// Agents allowed in driving direction only.
    pub fn users_one_way(&self) -> &BTreeSet<RoadUser> {
        &self.users_one_way
    }

    /// Agents allowed in both directions.
    pub fn users_bidirectional(&self) -> &BTreeSet<RoadUser> {
        &self.users_bidirectional
    }

    /// Left border marking.
    pub fn line_marking_left(&self) -> LineMarking {
        self.line_marking_left
    }

    /// Right border marking.
    pub fn line_marking_right(&self) -> LineMarking {
        self.line_marking_right
    }

    /// Traffic signs referenced by this lanelet.
    pub fn traffic_signs(&self) -> &[TrafficSignId] {
        &self.traffic_signs
    }

    /// Traffic lights referenced by this lanelet.
    pub fn traffic_lights(&self) -> &[TrafficLightId] {
        &self.traffic_lights
    }

    /// Stop line at the end of the lanelet, if any.
    pub fn stop_line(&self) -> Option<&StopLine> {
        self.stop_line.as_ref()
    }

    /// Test `shape` against the lanelet polygon under `policy`.
    pub fn check_intersection(&self, shape: &Polygon, policy: ContainmentType) -> bool {
        self.polygon.contains_shape(shape, policy)
    }

    /// Index of the center-line segment closest to `position`. Ties go
    /// to the lower index.
    pub fn closest_segment(&self, position: Point) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, w) in self.center.windows(2).enumerate() {
            let d = position.distance_to_segment_squared(w[0], w[1]);
            if d < best_dist {
                best_dist = d;
                best = i;
            }
        }
        best
    }

    /// Heading of the center-line segment closest to `position`.
    pub fn orientation_at(&self, position: Point) -> f64 {
        let i = self.closest_segment(position);
        (self.center[i + 1] - self.center[i]).angle()
    }

    /// Index of the center vertex closest to `position`.
    pub fn closest_vertex(&self, position: Point) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, c) in self.center.iter().enumerate() {
            let d = c.distance(position);
            if d < best_dist {
                best_dist = d;
                best = i;
            }
        }
        best
    }

    /// Lanelet width at the center vertex closest to `position`.
    pub fn width_at(&self, position: Point) -> f64 {
        let i = self.closest_vertex(position);
        self.left[i].distance(self.right[i])
    }
}

// ── LaneletBuilder ─────────────────────────────────────────────────

/// Incremental constructor for [`Lanelet`].
#[derive(Clone, Debug)]
pub struct LaneletBuilder {
    id: LaneletId,
    left: Vec<Point>,
    right: Vec<Point>,
    predecessors: SmallVec<[LaneletId; 2]>,
    successors: SmallVec<[LaneletId; 2]>,
    adjacent_left: Option<Adjacency>,
    adjacent_right: Option<Adjacency>,
    types: BTreeSet<LaneletType>,
    users_one_way: BTreeSet<RoadUser>,
    users_bidirectional: BTreeSet<RoadUser>,
    line_marking_left: LineMarking,
    line_marking_right: LineMarking,
    traffic_signs: Vec<TrafficSignId>,
    traffic_lights: Vec<TrafficLightId>,
    stop_line: Option<StopLine>,
}

impl LaneletBuilder {
    /// Start a lanelet with the given id.
    pub fn new(id: LaneletId) -> Self {
        Self {
            id,
            left: Vec::new(),
            right: Vec::new(),
            predecessors: SmallVec::new(),
            successors: SmallVec::new(),
            adjacent_left: None,
            adjacent_right: None,
            types: BTreeSet::new(),
            users_one_way: BTreeSet::new(),
            users_bidirectional: BTreeSet::new(),
            line_marking_left: LineMarking::default(),
            line_marking_right: LineMarking::default(),
            traffic_signs: Vec::new(),
            traffic_lights: Vec::new(),
            stop_line: None,
        }
    }

    /// Append one left-border vertex.
    pub fn left_vertex(mut self, p: Point) -> Self {
        self.left.push(p);
        self
    }

    /// Append one right-border vertex.
    pub fn right_vertex(mut self, p: Point) -> Self {
        self.right.push(p);
        self
    }

    /// Replace the left border.
    pub fn left_border(mut self, border: Vec<Point>) -> Self {
        self.left = border;
        self
    }

    /// Replace the right border.
    pub fn right_border(mut self, border: Vec<Point>) -> Self {
        self.right = border;
        self
    }

    /// Add a predecessor.
    pub fn predecessor(mut self, id: LaneletId) -> Self {
        if !self.predecessors.contains(&id) {
            self.predecessors.push(id);
        }
        self
    }

    /// Add a successor.
    pub fn successor(mut self, id: LaneletId) -> Self {
        if !self.successors.contains(&id) {
            self.successors.push(id);
        }
        self
    }

    /// Set the left neighbour.
    pub fn adjacent_left(mut self, id: LaneletId, direction: DrivingDirection) -> Self {
        self.adjacent_left = Some(Adjacency {
            lanelet: id,
            direction,
        });
        self
    }

    /// Set the right neighbour.
    pub fn adjacent_right(mut self, id: LaneletId, direction: DrivingDirection) -> Self {
        self.adjacent_right = Some(Adjacency {
            lanelet: id,
            direction,
        });
        self
    }

    /// Add a type tag.
    pub fn lanelet_type(mut self, ty: LaneletType) -> Self {
        self.types.insert(ty);
        self
    }

    /// Allow `user` in driving direction.
    pub fn user_one_way(mut self, user: RoadUser) -> Self {
        self.users_one_way.insert(user);
        self
    }

    /// Allow `user` in both directions.
    pub fn user_bidirectional(mut self, user: RoadUser) -> Self {
        self.users_bidirectional.insert(user);
        self
    }

    /// Set both border markings.
    pub fn line_markings(mut self, left: LineMarking, right: LineMarking) -> Self {
        self.line_marking_left = left;
        self.line_marking_right = right;
        self
    }

    /// Reference a traffic sign.
    pub fn traffic_sign(mut self, id: TrafficSignId) -> Self {
        self.traffic_signs.push(id);
        self
    }

    /// Reference a traffic light.
    pub fn traffic_light(mut self, id: TrafficLightId) -> Self {
        self.traffic_lights.push(id);
        self
    }

    /// Set the stop line.
    pub fn stop_line(mut self, stop_line: StopLine) -> Self {
        self.stop_line = Some(stop_line);
        self
    }

    /// Validate the borders and derive center line, path length, and polygon.
    pub fn build(self) -> Result<Lanelet, NetworkError> {
        if self.left.len() != self.right.len() {
            return Err(NetworkError::BorderLengthMismatch {
                lanelet: self.id,
                left: self.left.len(),
                right: self.right.len(),
            });
        }
        if self.left.len() < 2 {
            return Err(NetworkError::TooFewVertices {
                lanelet: self.id,
                count: self.left.len(),
            });
        }
        let center: Vec<Point> = self
            .left
            .iter()
            .zip(&self.right)
            .map(|(l, r)| l.midpoint(*r))
            .collect();
        let mut path_length = Vec::with_capacity(center.len());
        path_length.push(0.0);
        for w in center.windows(2) {
            let prev = path_length[path_length.len() - 1];
            path_length.push(prev + w[0].distance(w[1]));
        }
        let polygon =
            Polygon::from_borders(&self.left, &self.right).map_err(|source| NetworkError::Geometry {
                lanelet: self.id,
                source,
            })?;

        Ok(Lanelet {
            id: self.id,
            left: self.left,
            right: self.right,
            center,
            path_length,
            polygon,
            predecessors: self.predecessors,
            successors: self.successors,
            adjacent_left: self.adjacent_left,
            adjacent_right: self.adjacent_right,
            types: self.types,
            users_one_way: self.users_one_way,
            users_bidirectional: self.users_bidirectional,
            line_marking_left: self.line_marking_left,
            line_marking_right: self.line_marking_right,
            traffic_signs: self.traffic_signs,
            traffic_lights: self.traffic_lights,
            stop_line: self.stop_line,
        })
    }
}
