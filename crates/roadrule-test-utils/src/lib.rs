//! Scenario fixtures for roadrule development.
//!
//! Provides small hand-built road networks ([`fixtures`]) and a
//! [`VehicleBuilder`] for obstacles driving along the x axis.
//! Fixture constructors panic on invalid input; they are meant for tests
//! and benchmarks only.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use roadrule_core::{ActuatorParameters, ObstacleId, SensorParameters, TimeStep};
use roadrule_geometry::{Point, Shape};
use roadrule_obstacle::{Obstacle, ObstacleBuilder, ObstacleRole, State};

/// Builder for rectangular vehicles moving at constant velocity.
///
/// Defaults: 5 m × 2 m, heading 0, velocity 0, a single state at time
/// step 0, vehicle actuator limits, and dynamic sensor limits.
pub struct VehicleBuilder {
    id: ObstacleId,
    role: ObstacleRole,
    position: Point,
    orientation: f64,
    velocity: f64,
    length: f64,
    width: f64,
    steps: u64,
    dt: f64,
    actuator: Option<ActuatorParameters>,
    sensor: Option<SensorParameters>,
}

impl VehicleBuilder {
    pub fn new(id: u64) -> Self {
        Self {
            id: ObstacleId(id),
            role: ObstacleRole::Dynamic,
            position: Point::new(0.0, 0.0),
            orientation: 0.0,
            velocity: 0.0,
            length: 5.0,
            width: 2.0,
            steps: 1,
            dt: 0.1,
            actuator: None,
            sensor: None,
        }
    }

    /// Position at time step 0.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn orientation(mut self, orientation: f64) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn size(mut self, length: f64, width: f64) -> Self {
        self.length = length;
        self.width = width;
        self
    }

    /// Number of states, starting at time step 0, spaced `dt` apart.
    pub fn steps(mut self, steps: u64, dt: f64) -> Self {
        self.steps = steps.max(1);
        self.dt = dt;
        self
    }

    pub fn static_role(mut self) -> Self {
        self.role = ObstacleRole::Static;
        self
    }

    /// Longitudinal acceleration bounds `[a_min_long, a_max_long]`, with
    /// braking equal to `a_min_long`.
    pub fn braking(mut self, a_min_long: f64, a_max_long: f64) -> Self {
        let a_max = a_max_long.max(0.0);
        self.actuator = Some(
            ActuatorParameters::new(50.0, a_max, a_max, a_min_long, a_min_long)
                .expect("valid actuator parameters"),
        );
        self
    }

    pub fn reaction_time(mut self, reaction_time: Option<f64>) -> Self {
        self.sensor = Some(
            SensorParameters::new(250.0, 250.0, reaction_time).expect("valid sensor parameters"),
        );
        self
    }

    pub fn build(self) -> Obstacle {
        let heading = Point::new(self.orientation.cos(), self.orientation.sin());
        let states = (0..self.steps).map(|t| State {
            time_step: TimeStep(t),
            position: self.position + heading * (self.velocity * self.dt * t as f64),
            velocity: self.velocity,
            acceleration: 0.0,
            orientation: self.orientation,
        });
        let mut builder = ObstacleBuilder::new(self.id, self.role)
            .shape(Shape::rectangle(self.length, self.width).expect("valid vehicle size"))
            .states(states);
        if let Some(a) = self.actuator {
            builder = builder.actuator(a);
        }
        if let Some(s) = self.sensor {
            builder = builder.sensor(s);
        }
        builder.build().expect("valid vehicle")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_velocity_trajectory() {
        let v = VehicleBuilder::new(3).at(1.0, 0.0).velocity(10.0).steps(3, 0.5).build();
        assert_eq!(v.final_time_step(), TimeStep(2));
        assert_eq!(v.state_at(TimeStep(2)).unwrap().position, Point::new(11.0, 0.0));
    }
}
