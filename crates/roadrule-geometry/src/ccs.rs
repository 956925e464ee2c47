//! Curvilinear (Frenet-style) coordinate system along a reference polyline.
//!
//! [`CurvilinearCoordinateSystem`] maps Cartesian `(x, y)` to
//! longitudinal/lateral `(s, d)` and back:
//!
//! - `s` is the arclength along the reference path to the projection foot.
//! - `d` is the signed lateral offset, positive to the left of the
//!   direction of travel.
//!
//! # Lateral directions
//!
//! Each vertex carries a unit pseudo-normal: the segment's left normal at
//! the two end vertices, and the normalized sum of the two adjacent
//! segment normals at interior vertices. Within a segment the lateral
//! direction is the linear blend of its two vertex normals. Projection
//! solves, per segment, for the parameter `λ` at which the query point lies
//! on the blended lateral ray through `p(λ)`, which is a quadratic in `λ`.
//! Because the inverse transform uses the very same blended direction,
//! `to_cartesian(to_curvilinear(p)) == p` up to rounding for every point
//! the forward transform accepts, including points on the outside of a
//! bend where plain perpendicular projection leaves gaps.
//!
//! # Segment selection
//!
//! When several segments admit a foot, the one with the smallest `|d|`
//! wins; ties (within `1e-12`) go to the lowest segment index. A point
//! exactly on an interior vertex therefore always resolves to the
//! segment ending at that vertex. The inverse picks the segment whose
//! arclength bracket `[s_i, s_{i+1})` contains `s`, the last segment
//! also owning its end point.

use crate::error::{GeometryError, ProjectionError};
use crate::point::Point;

/// Tolerances for [`CurvilinearCoordinateSystem`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvilinearConfig {
    /// Maximum unsigned lateral distance accepted by either transform,
    /// in metres. Default: 25.0.
    pub corridor_limit: f64,
    /// Slack on the per-segment parameter range `[0, 1]` and on the
    /// longitudinal range `[0, length]`. Default: 1e-9.
    pub eps: f64,
}

impl Default for CurvilinearConfig {
    fn default() -> Self {
        Self {
            corridor_limit: 25.0,
            eps: 1e-9,
        }
    }
}

const TIE_EPS: f64 = 1e-12;

/// Bidirectional `(x, y) <-> (s, d)` transform along a polyline.
#[derive(Clone, Debug)]
pub struct CurvilinearCoordinateSystem {
    points: Vec<Point>,
    /// Cumulative arclength at each vertex; `arclength[0] == 0`.
    arclength: Vec<f64>,
    /// Unit pseudo-normal per vertex.
    normals: Vec<Point>,
    config: CurvilinearConfig,
}

impl CurvilinearCoordinateSystem {
    /// Build with default tolerances.
    pub fn new(reference_path: &[Point]) -> Result<Self, GeometryError> {
        Self::with_config(reference_path, CurvilinearConfig::default())
    }

    /// Build with explicit tolerances.
    ///
    /// Consecutive duplicate points are removed first. Fails with
    /// [`GeometryError::DegeneratePath`] if fewer than two distinct
    /// points remain, and with [`GeometryError::Cusp`] if the path
    /// reverses direction at a vertex.
    pub fn with_config(
        reference_path: &[Point],
        config: CurvilinearConfig,
    ) -> Result<Self, GeometryError> {
        let mut points: Vec<Point> = Vec::with_capacity(reference_path.len());
        for &p in reference_path {
            match points.last() {
                Some(&last) if last.distance(p) <= f64::EPSILON => {}
                _ => points.push(p),
            }
        }
        if points.len() < 2 {
            return Err(GeometryError::DegeneratePath {
                distinct_points: points.len(),
            });
        }

        let mut arclength = Vec::with_capacity(points.len());
        let mut segment_normals = Vec::with_capacity(points.len() - 1);
        arclength.push(0.0);
        for (i, w) in points.windows(2).enumerate() {
            let b = w[1] - w[0];
            arclength.push(arclength[i] + b.norm());
            let n = b
                .perp()
                .normalized()
                .ok_or(GeometryError::DegeneratePath {
                    distinct_points: points.len(),
                })?;
            segment_normals.push(n);
        }

        let last = segment_normals.len() - 1;
        let mut normals = Vec::with_capacity(points.len());
        normals.push(segment_normals[0]);
        for i in 1..points.len() - 1 {
            let n = (segment_normals[i - 1] + segment_normals[i])
                .normalized()
                .ok_or(GeometryError::Cusp { index: i })?;
            normals.push(n);
        }
        normals.push(segment_normals[last]);

        Ok(Self {
            points,
            arclength,
            normals,
            config,
        })
    }

    /// The reference polyline after duplicate removal.
    pub fn reference_path(&self) -> &[Point] {
        &self.points
    }

    /// Total arclength of the reference path.
    pub fn length(&self) -> f64 {
        self.arclength[self.arclength.len() - 1]
    }

    /// Configured tolerances.
    pub fn config(&self) -> &CurvilinearConfig {
        &self.config
    }

    /// Project a Cartesian point to `(s, d)`.
    pub fn to_curvilinear(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let q = Point::new(x, y);
        let eps = self.config.eps;
        let mut best: Option<(f64, f64)> = None;
        let mut best_abs = f64::INFINITY;

        for i in 0..self.points.len() - 1 {
            let p0 = self.points[i];
            let b = self.points[i + 1] - p0;
            let n0 = self.normals[i];
            let dn = self.normals[i + 1] - n0;
            let w = q - p0;

            let a = -b.cross(dn);
            let bq = w.cross(dn) - b.cross(n0);
            let c = w.cross(n0);

            for lambda in solve_quadratic(a, bq, c).into_iter().flatten() {
                if !(-eps..=1.0 + eps).contains(&lambda) {
                    continue;
                }
                let lambda = lambda.clamp(0.0, 1.0);
                let Some(dir) = (n0 + dn * lambda).normalized() else {
                    continue;
                };
                let d = (q - (p0 + b * lambda)).dot(dir);
                if d.abs() < best_abs - TIE_EPS {
                    best_abs = d.abs();
                    let s = self.arclength[i] + lambda * (self.arclength[i + 1] - self.arclength[i]);
                    best = Some((s, d));
                }
            }
        }

        match best {
            None => Err(ProjectionError::OutOfDomain { x, y }),
            Some(_) if best_abs > self.config.corridor_limit => Err(ProjectionError::OutOfCorridor {
                x,
                y,
                distance: best_abs,
                limit: self.config.corridor_limit,
            }),
            Some(sd) => Ok(sd),
        }
    }

    /// Map `(s, d)` back to a Cartesian point.
    pub fn to_cartesian(&self, s: f64, d: f64) -> Result<Point, ProjectionError> {
        let length = self.length();
        let eps = self.config.eps;
        if !(-eps..=length + eps).contains(&s) {
            return Err(ProjectionError::LongitudinalOutOfRange { s, length });
        }
        if d.abs() > self.config.corridor_limit {
            return Err(ProjectionError::LateralOutOfRange {
                d,
                limit: self.config.corridor_limit,
            });
        }
        let s = s.clamp(0.0, length);
        let i = self.segment_at(s);
        let p0 = self.points[i];
        let b = self.points[i + 1] - p0;
        let lambda = (s - self.arclength[i]) / (self.arclength[i + 1] - self.arclength[i]);
        let n0 = self.normals[i];
        let dn = self.normals[i + 1] - n0;
        let dir = (n0 + dn * lambda)
            .normalized()
            .unwrap_or_else(|| b.perp() * (1.0 / b.norm()));
        Ok(p0 + b * lambda + dir * d)
    }

    /// Unit tangent of the reference path at arclength `s` (clamped to
    /// the path).
    pub fn tangent_at(&self, s: f64) -> Point {
        let i = self.segment_at(s.clamp(0.0, self.length()));
        let b = self.points[i + 1] - self.points[i];
        b * (1.0 / b.norm())
    }

    /// Heading of the reference path at arclength `s`.
    pub fn orientation_at(&self, s: f64) -> f64 {
        self.tangent_at(s).angle()
    }

    /// Index of the segment owning arclength `s`.
    fn segment_at(&self, s: f64) -> usize {
        let segments = self.points.len() - 1;
        let idx = self.arclength.partition_point(|&a| a <= s);
        idx.saturating_sub(1).min(segments - 1)
    }
}

/// Real roots of `a x^2 + b x + c = 0`, degrading to the linear case for
/// vanishing `a`.
fn solve_quadratic(a: f64, b: f64, c: f64) -> [Option<f64>; 2] {
    let scale = a.abs().max(b.abs()).max(c.abs()).max(1.0);
    if a.abs() <= 1e-12 * scale {
        if b.abs() <= f64::EPSILON * scale {
            return [None, None];
        }
        return [Some(-c / b), None];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return [None, None];
    }
    let sq = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sq);
    if q == 0.0 {
        return [Some(0.0), None];
    }
    [Some(q / a), Some(c / q)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn straight() -> CurvilinearCoordinateSystem {
        CurvilinearCoordinateSystem::new(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]).unwrap()
    }

    fn bend() -> CurvilinearCoordinateSystem {
        CurvilinearCoordinateSystem::new(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 5.0),
            Point::new(30.0, 15.0),
        ])
        .unwrap()
    }

    #[test]
    fn straight_line_coordinates() {
        let ccs = straight();
        let (s, d) = ccs.to_curvilinear(30.0, 2.0).unwrap();
        assert!((s - 30.0).abs() < 1e-12);
        assert!((d - 2.0).abs() < 1e-12);
        let (_, d) = ccs.to_curvilinear(30.0, -1.5).unwrap();
        assert!((d + 1.5).abs() < 1e-12);
    }

    #[test]
    fn duplicate_points_are_dropped() {
        let ccs = CurvilinearCoordinateSystem::new(&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
        ])
        .unwrap();
        assert_eq!(ccs.reference_path().len(), 2);
        assert_eq!(ccs.length(), 5.0);
    }

    #[test]
    fn degenerate_path_rejected() {
        let err = CurvilinearCoordinateSystem::new(&[Point::new(1.0, 1.0), Point::new(1.0, 1.0)])
            .unwrap_err();
        assert_eq!(err, GeometryError::DegeneratePath { distinct_points: 1 });
        assert!(CurvilinearCoordinateSystem::new(&[]).is_err());
    }

    #[test]
    fn cusp_rejected() {
        let err = CurvilinearCoordinateSystem::new(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
        ])
        .unwrap_err();
        assert_eq!(err, GeometryError::Cusp { index: 1 });
    }

    #[test]
    fn point_before_start_has_no_projection() {
        let err = straight().to_curvilinear(-5.0, 0.0).unwrap_err();
        assert!(matches!(err, ProjectionError::OutOfDomain { .. }));
    }

    #[test]
    fn point_outside_corridor_rejected() {
        let err = straight().to_curvilinear(50.0, 40.0).unwrap_err();
        assert!(matches!(err, ProjectionError::OutOfCorridor { .. }));
    }

    #[test]
    fn longitudinal_range_checked() {
        let ccs = straight();
        assert!(matches!(
            ccs.to_cartesian(101.0, 0.0),
            Err(ProjectionError::LongitudinalOutOfRange { .. })
        ));
        assert!(ccs.to_cartesian(100.0, 0.0).is_ok());
    }

    #[test]
    fn vertex_resolves_to_lower_segment() {
        let ccs = bend();
        // Exactly on the vertex (10, 0): both adjacent segments reach it
        // with d = 0. The answer must be stable across calls.
        let first = ccs.to_curvilinear(10.0, 0.0).unwrap();
        for _ in 0..10 {
            assert_eq!(ccs.to_curvilinear(10.0, 0.0).unwrap(), first);
        }
        assert!((first.0 - 10.0).abs() < 1e-9);
        assert!(first.1.abs() < 1e-9);
    }

    #[test]
    fn outer_side_of_bend_is_covered() {
        let ccs = bend();
        // Right of the left-turning bend at (10, 0): outside of the corner.
        let (s, d) = ccs.to_curvilinear(11.0, -2.0).unwrap();
        assert!(d < 0.0);
        let back = ccs.to_cartesian(s, d).unwrap();
        assert!((back.x - 11.0).abs() < 1e-9);
        assert!((back.y + 2.0).abs() < 1e-9);
    }

    #[test]
    fn orientation_follows_segments() {
        let ccs = bend();
        assert!(ccs.orientation_at(5.0).abs() < 1e-12);
        let last = ccs.orientation_at(ccs.length());
        assert!((last - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn cartesian_round_trip(x in 0.5f64..29.0, y in -3.0f64..3.0, amp in 0.0f64..3.0) {
            let path: Vec<Point> = (0..=30)
                .map(|i| {
                    let t = i as f64;
                    Point::new(t, amp * (t / 6.0).sin())
                })
                .collect();
            let ccs = CurvilinearCoordinateSystem::new(&path).unwrap();
            let q = Point::new(x, y + amp * (x / 6.0).sin());
            if let Ok((s, d)) = ccs.to_curvilinear(q.x, q.y) {
                let back = ccs.to_cartesian(s, d).unwrap();
                prop_assert!(back.distance(q) < 5e-4);
            }
        }

        #[test]
        fn curvilinear_round_trip_on_gentle_curve(s in 0.5f64..25.0, d in -2.0f64..2.0) {
            let path: Vec<Point> = (0..=30)
                .map(|i| {
                    let t = i as f64;
                    Point::new(t, 0.5 * (t / 8.0).sin())
                })
                .collect();
            let ccs = CurvilinearCoordinateSystem::new(&path).unwrap();
            let p = ccs.to_cartesian(s, d).unwrap();
            let (s2, d2) = ccs.to_curvilinear(p.x, p.y).unwrap();
            prop_assert!((s2 - s).abs() < 5e-4);
            prop_assert!((d2 - d).abs() < 5e-4);
        }
    }
}
