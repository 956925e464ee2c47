//! Regulatory elements: traffic signs, traffic lights, and stop lines.
//!
//! Lanelets refer to signs and lights by id; the
//! [`RoadNetwork`](crate::RoadNetwork) owns the elements themselves.

use std::fmt;

use roadrule_core::TimeStep;
use roadrule_geometry::Point;

use crate::types::{LineMarking, TurningDirection};

/// Identifies a traffic sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrafficSignId(pub u64);

impl fmt::Display for TrafficSignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a traffic light.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrafficLightId(pub u64);

impl fmt::Display for TrafficLightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Traffic signs ──────────────────────────────────────────────────

/// One element of a (possibly composite) traffic sign.
#[derive(Clone, Debug, PartialEq)]
pub struct TrafficSignElement {
    /// Country-specific sign code, e.g. `"274"` for a German speed limit.
    pub code: String,
    /// Additional values, e.g. the speed limit itself.
    pub values: Vec<String>,
}

/// A traffic sign, possibly made of several elements.
#[derive(Clone, Debug, PartialEq)]
pub struct TrafficSign {
    /// Unique id.
    pub id: TrafficSignId,
    /// Sign elements, outermost first.
    pub elements: Vec<TrafficSignElement>,
    /// Position of the sign post, if known.
    pub position: Option<Point>,
    /// `true` for signs that exist only in the map, not on the road.
    pub is_virtual: bool,
}

impl TrafficSign {
    /// `true` if any element carries `code`.
    pub fn has_element(&self, code: &str) -> bool {
        self.elements.iter().any(|e| e.code == code)
    }
}

// ── Traffic lights ─────────────────────────────────────────────────

/// Colour shown by a traffic light.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrafficLightColor {
    /// Red.
    Red,
    /// Red and yellow together.
    RedYellow,
    /// Green.
    Green,
    /// Yellow.
    Yellow,
    /// Switched off.
    Inactive,
}

/// One phase of a traffic-light cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrafficLightCycleElement {
    /// Colour during this phase.
    pub color: TrafficLightColor,
    /// Phase duration in time steps.
    pub duration: u64,
}

/// A cyclic traffic light.
#[derive(Clone, Debug, PartialEq)]
pub struct TrafficLight {
    /// Unique id.
    pub id: TrafficLightId,
    /// Phases in order. Repeats indefinitely.
    pub cycle: Vec<TrafficLightCycleElement>,
    /// Time step at which the first phase starts.
    pub offset: u64,
    /// Direction the light controls, `None` for all directions.
    pub direction: Option<TurningDirection>,
    /// Whether the light is switched on.
    pub active: bool,
    /// Position of the light, if known.
    pub position: Option<Point>,
}

impl TrafficLight {
    /// Colour shown at `time_step`.
    ///
    /// Inactive lights and lights with an empty or zero-length cycle
    /// report [`TrafficLightColor::Inactive`]. Time steps before `offset`
    /// continue the cycle backwards.
    pub fn color_at(&self, time_step: TimeStep) -> TrafficLightColor {
        let total: u64 = self.cycle.iter().map(|c| c.duration).sum();
        if !self.active || total == 0 {
            return TrafficLightColor::Inactive;
        }
        let rel = (time_step.0 as i128 - self.offset as i128).rem_euclid(total as i128) as u64;
        let mut start = 0;
        for phase in &self.cycle {
            if rel < start + phase.duration {
                return phase.color;
            }
            start += phase.duration;
        }
        TrafficLightColor::Inactive
    }
}

// ── Stop lines ─────────────────────────────────────────────────────

/// A stop line across a lanelet.
#[derive(Clone, Debug, PartialEq)]
pub struct StopLine {
    /// First end point.
    pub start: Point,
    /// Second end point.
    pub end: Point,
    /// Marking style.
    pub line_marking: LineMarking,
    /// Signs that belong to this stop line.
    pub traffic_signs: Vec<TrafficSignId>,
    /// Lights that belong to this stop line.
    pub traffic_lights: Vec<TrafficLightId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> TrafficLight {
        TrafficLight {
            id: TrafficLightId(1),
            cycle: vec![
                TrafficLightCycleElement {
                    color: TrafficLightColor::Red,
                    duration: 3,
                },
                TrafficLightCycleElement {
                    color: TrafficLightColor::Green,
                    duration: 2,
                },
            ],
            offset: 1,
            direction: None,
            active: true,
            position: None,
        }
    }

    #[test]
    fn cycle_wraps() {
        let l = light();
        assert_eq!(l.color_at(TimeStep(1)), TrafficLightColor::Red);
        assert_eq!(l.color_at(TimeStep(3)), TrafficLightColor::Red);
        assert_eq!(l.color_at(TimeStep(4)), TrafficLightColor::Green);
        assert_eq!(l.color_at(TimeStep(6)), TrafficLightColor::Red);
    }

    #[test]
    fn before_offset_runs_backwards() {
        assert_eq!(light().color_at(TimeStep(0)), TrafficLightColor::Green);
    }

    #[test]
    fn inactive_light_reports_inactive() {
        let mut l = light();
        l.active = false;
        assert_eq!(l.color_at(TimeStep(2)), TrafficLightColor::Inactive);
    }

    #[test]
    fn sign_element_lookup() {
        let s = TrafficSign {
            id: TrafficSignId(5),
            elements: vec![TrafficSignElement {
                code: "274".into(),
                values: vec!["13.89".into()],
            }],
            position: None,
            is_virtual: false,
        };
        assert!(s.has_element("274"));
        assert!(!s.has_element("206"));
    }
}
