//! Closed simple polygons and the two containment policies.
//!
//! A [`Polygon`] is stored as a closed ring (first vertex repeated at the
//! end) with counter-clockwise winding, whatever order the caller
//! supplied. All predicates treat the boundary as part of the polygon:
//! two polygons that only touch along an edge or at a corner *do*
//! intersect.

use crate::bbox::BoundingBox;
use crate::error::GeometryError;
use crate::point::Point;

/// How a shape must relate to a region to count as "in" it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainmentType {
    /// Any overlap, including touching boundaries.
    PartiallyContained,
    /// The shape lies entirely inside the region (boundary allowed).
    CompletelyContained,
}

/// A closed simple polygon with counter-clockwise winding.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    ring: Vec<Point>,
    bbox: BoundingBox,
}

impl Polygon {
    /// Build a polygon from an open or closed vertex list.
    ///
    /// Consecutive duplicate vertices are dropped, the ring is closed,
    /// and the winding is normalized to counter-clockwise.
    pub fn new(points: impl IntoIterator<Item = Point>) -> Result<Self, GeometryError> {
        let mut ring: Vec<Point> = Vec::new();
        for p in points {
            if ring.last() != Some(&p) {
                ring.push(p);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(GeometryError::EmptyPolygon {
                vertices: ring.len(),
            });
        }
        if shoelace(&ring) < 0.0 {
            ring.reverse();
        }
        ring.push(ring[0]);
        let bbox = BoundingBox::from_points(&ring);
        Ok(Self { ring, bbox })
    }

    /// Build the outline of a strip bounded by two polylines: the left
    /// border forward, then the right border reversed.
    pub fn from_borders(left: &[Point], right: &[Point]) -> Result<Self, GeometryError> {
        Self::new(left.iter().copied().chain(right.iter().rev().copied()))
    }

    /// The closed ring, first vertex repeated at the end.
    pub fn exterior(&self) -> &[Point] {
        &self.ring
    }

    /// The distinct vertices (ring without the closing vertex).
    pub fn vertices(&self) -> &[Point] {
        &self.ring[..self.ring.len() - 1]
    }

    /// Axis-aligned bounds.
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Enclosed area. Always non-negative.
    pub fn area(&self) -> f64 {
        shoelace(self.vertices())
    }

    /// Iterate the polygon's edges as `(start, end)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.ring.windows(2).map(|w| (w[0], w[1]))
    }

    /// Closed point containment (boundary counts as inside).
    pub fn contains_point(&self, p: Point) -> bool {
        if !self.bbox.contains(p) {
            return false;
        }
        if self
            .edges()
            .any(|(a, b)| p.distance_to_segment_squared(a, b) <= BOUNDARY_EPS_SQ)
        {
            return true;
        }
        // Even-odd ray cast towards +x.
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// `true` if the two polygons share at least one point.
    pub fn intersects(&self, other: &Polygon) -> bool {
        if !self.bbox.overlaps(&other.bbox) {
            return false;
        }
        for (a, b) in self.edges() {
            for (c, d) in other.edges() {
                if segments_touch(a, b, c, d) {
                    return true;
                }
            }
        }
        // No boundary contact: either disjoint or one nests inside the other.
        other.contains_point(self.ring[0]) || self.contains_point(other.ring[0])
    }

    /// `true` if `self` lies entirely inside `other`.
    pub fn within(&self, other: &Polygon) -> bool {
        if !self.bbox.overlaps(&other.bbox) {
            return false;
        }
        if !self.vertices().iter().all(|&p| other.contains_point(p)) {
            return false;
        }
        for (a, b) in self.edges() {
            if !other.contains_point(a.midpoint(b)) {
                return false;
            }
            if other
                .edges()
                .any(|(c, d)| segments_cross_properly(a, b, c, d))
            {
                return false;
            }
        }
        true
    }

    /// Test whether `shape` relates to `self` under `policy`.
    pub fn contains_shape(&self, shape: &Polygon, policy: ContainmentType) -> bool {
        match policy {
            ContainmentType::PartiallyContained => self.intersects(shape),
            ContainmentType::CompletelyContained => shape.within(self),
        }
    }
}

const BOUNDARY_EPS_SQ: f64 = 1e-18;

/// Signed area; positive for counter-clockwise rings. `pts` is open.
fn shoelace(pts: &[Point]) -> f64 {
    let n = pts.len();
    let mut acc = 0.0;
    for i in 0..n {
        acc += pts[i].cross(pts[(i + 1) % n]);
    }
    0.5 * acc
}

fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed segment intersection: touching endpoints and collinear
/// overlap count.
fn segments_touch(a: Point, b: Point, c: Point, d: Point) -> bool {
    let d1 = orient(c, d, a);
    let d2 = orient(c, d, b);
    let d3 = orient(a, b, c);
    let d4 = orient(a, b, d);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1 == 0.0 && on_segment(c, d, a))
        || (d2 == 0.0 && on_segment(c, d, b))
        || (d3 == 0.0 && on_segment(a, b, c))
        || (d4 == 0.0 && on_segment(a, b, d))
}

/// Proper crossing: the interiors cross at a single point.
fn segments_cross_properly(a: Point, b: Point, c: Point, d: Point) -> bool {
    let d1 = orient(c, d, a);
    let d2 = orient(c, d, b);
    let d3 = orient(a, b, c);
    let d4 = orient(a, b, d);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}
