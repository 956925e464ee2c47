//! Kinematic states and signal states.

use roadrule_core::TimeStep;
use roadrule_geometry::Point;

/// Kinematic state of an obstacle at one time step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct State {
    /// Time step this state belongs to.
    pub time_step: TimeStep,
    /// Position of the shape's center.
    pub position: Point,
    /// Longitudinal velocity, m/s.
    pub velocity: f64,
    /// Longitudinal acceleration, m/s².
    pub acceleration: f64,
    /// Heading, radians.
    pub orientation: f64,
}

impl State {
    /// A state with zero velocity and acceleration.
    pub fn at_rest(time_step: TimeStep, position: Point, orientation: f64) -> Self {
        Self {
            time_step,
            position,
            velocity: 0.0,
            acceleration: 0.0,
            orientation,
        }
    }
}

/// Indicator and light signals at one time step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignalState {
    /// Horn active.
    pub horn: bool,
    /// Left turn indicator on.
    pub indicator_left: bool,
    /// Right turn indicator on.
    pub indicator_right: bool,
    /// Brake lights on.
    pub braking_lights: bool,
    /// Hazard warning lights on.
    pub hazard_warning_lights: bool,
    /// Blue flashing lights on.
    pub flashing_blue_lights: bool,
}
