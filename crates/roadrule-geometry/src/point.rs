//! 2D points and vector arithmetic.

use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A point (or free vector) in the Cartesian plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// x coordinate in metres.
    pub x: f64,
    /// y coordinate in metres.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Dot product.
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product. Positive when `other` lies
    /// counter-clockwise of `self`.
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Euclidean length.
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        (self - other).norm()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn normalized(self) -> Option<Point> {
        let n = self.norm();
        if n > f64::EPSILON {
            Some(Point::new(self.x / n, self.y / n))
        } else {
            None
        }
    }

    /// This vector rotated by +90 degrees (the left normal of a direction).
    pub fn perp(self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// Rotate about the origin by `angle` radians.
    pub fn rotate(self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Heading of this vector, `atan2(y, x)`.
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Midpoint between `self` and `other`.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }

    /// Squared distance from this point to the closed segment `a`-`b`.
    pub fn distance_to_segment_squared(self, a: Point, b: Point) -> f64 {
        let ab = b - a;
        let len_sq = ab.dot(ab);
        if len_sq == 0.0 {
            let d = self - a;
            return d.dot(d);
        }
        let t = ((self - a).dot(ab) / len_sq).clamp(0.0, 1.0);
        let foot = a + ab * t;
        let d = self - foot;
        d.dot(d)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Wrap an angle to `[-pi, pi]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cross_sign_follows_orientation() {
        let x = Point::new(1.0, 0.0);
        let y = Point::new(0.0, 1.0);
        assert!(x.cross(y) > 0.0);
        assert!(y.cross(x) < 0.0);
    }

    #[test]
    fn perp_is_left_normal() {
        assert_eq!(Point::new(1.0, 0.0).perp(), Point::new(0.0, 1.0));
    }

    #[test]
    fn segment_distance_perpendicular_and_endpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((Point::new(5.0, 3.0).distance_to_segment_squared(a, b) - 9.0).abs() < 1e-12);
        assert!((Point::new(-3.0, 4.0).distance_to_segment_squared(a, b) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert!(Point::new(0.0, 0.0).normalized().is_none());
    }

    #[test]
    fn wrap_angle_examples() {
        assert!((wrap_angle(3.0 * PI).abs() - PI).abs() < 1e-12);
        assert!((wrap_angle(-1.5 * PI) - 0.5 * PI).abs() < 1e-12);
        assert_eq!(wrap_angle(0.25), 0.25);
    }

    proptest! {
        #[test]
        fn wrap_angle_stays_in_range(a in -100.0f64..100.0) {
            let w = wrap_angle(a);
            prop_assert!((-PI..=PI).contains(&w));
            prop_assert!((w.cos() - a.cos()).abs() < 1e-9);
            prop_assert!((w.sin() - a.sin()).abs() < 1e-9);
        }

        #[test]
        fn rotation_preserves_length(x in -50.0f64..50.0, y in -50.0f64..50.0, t in -7.0f64..7.0) {
            let p = Point::new(x, y);
            prop_assert!((p.rotate(t).norm() - p.norm()).abs() < 1e-9);
        }
    }
}
