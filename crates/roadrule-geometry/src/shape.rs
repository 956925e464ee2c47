//! Footprints of traffic participants.

use std::f64::consts::PI;

use crate::error::GeometryError;
use crate::point::Point;
use crate::polygon::Polygon;

/// Number of vertices used to approximate a circle as a polygon.
const CIRCLE_SEGMENTS: usize = 16;

/// Shape of an obstacle in its local frame (centred on the origin,
/// length along the local x axis).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Oriented rectangle.
    Rectangle {
        /// Extent along the heading.
        length: f64,
        /// Extent across the heading.
        width: f64,
    },
    /// Circle.
    Circle {
        /// Radius.
        radius: f64,
    },
}

fn positive(name: &'static str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidDimension { name, value })
    }
}

impl Shape {
    /// Validated rectangle.
    pub fn rectangle(length: f64, width: f64) -> Result<Self, GeometryError> {
        positive("length", length)?;
        positive("width", width)?;
        Ok(Self::Rectangle { length, width })
    }

    /// Validated circle.
    pub fn circle(radius: f64) -> Result<Self, GeometryError> {
        positive("radius", radius)?;
        Ok(Self::Circle { radius })
    }

    /// Extent along the heading (diameter for circles).
    pub fn length(&self) -> f64 {
        match *self {
            Self::Rectangle { length, .. } => length,
            Self::Circle { radius } => 2.0 * radius,
        }
    }

    /// Extent across the heading (diameter for circles).
    pub fn width(&self) -> f64 {
        match *self {
            Self::Rectangle { width, .. } => width,
            Self::Circle { radius } => 2.0 * radius,
        }
    }

    /// Corners of the bounding rectangle at the given pose, in the order
    /// rear-right, front-right, front-left, rear-left.
    pub fn corners(&self, center: Point, orientation: f64) -> [Point; 4] {
        const SIGNS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        let half_l = 0.5 * self.length();
        let half_w = 0.5 * self.width();
        SIGNS.map(|(sl, sw)| center + Point::new(sl * half_l, sw * half_w).rotate(orientation))
    }

    /// The footprint placed at `center` with heading `orientation`.
    ///
    /// Circles are approximated by a regular polygon whose vertices lie
    /// on the circle. Fails only for a shape built with non-positive
    /// dimensions through the public variants.
    pub fn occupancy(&self, center: Point, orientation: f64) -> Result<Polygon, GeometryError> {
        let pts: Vec<Point> = match *self {
            Self::Rectangle { .. } => self.corners(center, orientation).to_vec(),
            Self::Circle { radius } => (0..CIRCLE_SEGMENTS)
                .map(|i| {
                    let a = 2.0 * PI * i as f64 / CIRCLE_SEGMENTS as f64;
                    center + Point::new(radius * a.cos(), radius * a.sin())
                })
                .collect(),
        };
        Polygon::new(pts)
    }
}
