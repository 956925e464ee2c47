//! Actuator and sensor limits of a traffic participant.
//!
//! Both records validate their domain on construction and are immutable
//! afterwards, so every value reachable through an accessor satisfies
//! the documented constraints.

use crate::error::ParameterError;

fn non_negative(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ParameterError::InvalidValue {
            name,
            value,
            constraint: "finite and >= 0",
        })
    }
}

fn non_positive(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() && value <= 0.0 {
        Ok(())
    } else {
        Err(ParameterError::InvalidValue {
            name,
            value,
            constraint: "finite and <= 0",
        })
    }
}

// ── ActuatorParameters ─────────────────────────────────────────────

/// Kinematic limits of an obstacle.
///
/// Accelerations are in m/s², velocities in m/s.
///
/// # Constraints
///
/// - `v_max`, `a_max`, `a_max_long` are non-negative.
/// - `a_min_long` and `a_braking` are non-positive.
/// - `a_max_long <= a_max`.
/// - `|a_braking| <= |a_min_long|`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActuatorParameters {
    v_max: f64,
    a_max: f64,
    a_max_long: f64,
    a_min_long: f64,
    a_braking: f64,
}

impl ActuatorParameters {
    /// Build a validated actuator record.
    pub fn new(
        v_max: f64,
        a_max: f64,
        a_max_long: f64,
        a_min_long: f64,
        a_braking: f64,
    ) -> Result<Self, ParameterError> {
        non_negative("v_max", v_max)?;
        non_negative("a_max", a_max)?;
        non_negative("a_max_long", a_max_long)?;
        non_positive("a_min_long", a_min_long)?;
        non_positive("a_braking", a_braking)?;
        if a_max_long > a_max {
            return Err(ParameterError::Inconsistent {
                reason: format!("a_max_long {a_max_long} exceeds a_max {a_max}"),
            });
        }
        if a_braking.abs() > a_min_long.abs() {
            return Err(ParameterError::Inconsistent {
                reason: format!(
                    "|a_braking| {} exceeds |a_min_long| {}",
                    a_braking.abs(),
                    a_min_long.abs()
                ),
            });
        }
        Ok(Self {
            v_max,
            a_max,
            a_max_long,
            a_min_long,
            a_braking,
        })
    }

    /// Limits for a generic passenger vehicle: `(50, 5, 5, -10.5, -10.5)`.
    pub fn vehicle_defaults() -> Self {
        Self {
            v_max: 50.0,
            a_max: 5.0,
            a_max_long: 5.0,
            a_min_long: -10.5,
            a_braking: -10.5,
        }
    }

    /// Limits for the ego vehicle: `(50, 3, 3, -10, -10)`.
    pub fn ego_defaults() -> Self {
        Self {
            v_max: 50.0,
            a_max: 3.0,
            a_max_long: 3.0,
            a_min_long: -10.0,
            a_braking: -10.0,
        }
    }

    /// Limits for a pedestrian with symmetric acceleration bounds.
    pub fn pedestrian(v_max: f64, a_max: f64) -> Result<Self, ParameterError> {
        Self::new(v_max, a_max, a_max, -a_max, -a_max)
    }

    /// Pedestrian limits with default values: `v_max = 2`, `a_max = 0.6`.
    pub fn pedestrian_defaults() -> Self {
        Self {
            v_max: 2.0,
            a_max: 0.6,
            a_max_long: 0.6,
            a_min_long: -0.6,
            a_braking: -0.6,
        }
    }

    /// All-zero limits used for static obstacles.
    pub fn static_defaults() -> Self {
        Self {
            v_max: 0.0,
            a_max: 0.0,
            a_max_long: 0.0,
            a_min_long: 0.0,
            a_braking: 0.0,
        }
    }

    /// Maximum velocity.
    pub fn v_max(&self) -> f64 {
        self.v_max
    }

    /// Maximum absolute acceleration.
    pub fn a_max(&self) -> f64 {
        self.a_max
    }

    /// Maximum longitudinal acceleration.
    pub fn a_max_long(&self) -> f64 {
        self.a_max_long
    }

    /// Minimum (most negative) longitudinal acceleration.
    pub fn a_min_long(&self) -> f64 {
        self.a_min_long
    }

    /// Braking acceleration assumed for emergency manoeuvres.
    pub fn a_braking(&self) -> f64 {
        self.a_braking
    }
}

// ── SensorParameters ───────────────────────────────────────────────

/// Perception limits of an obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorParameters {
    field_of_view_rear: f64,
    field_of_view_front: f64,
    reaction_time: Option<f64>,
}

impl SensorParameters {
    /// Build a validated sensor record.
    pub fn new(
        field_of_view_rear: f64,
        field_of_view_front: f64,
        reaction_time: Option<f64>,
    ) -> Result<Self, ParameterError> {
        non_negative("field_of_view_rear", field_of_view_rear)?;
        non_negative("field_of_view_front", field_of_view_front)?;
        if let Some(t) = reaction_time {
            non_negative("reaction_time", t)?;
        }
        Ok(Self {
            field_of_view_rear,
            field_of_view_front,
            reaction_time,
        })
    }

    /// Defaults for dynamic obstacles: 250 m both ways, 0.3 s reaction.
    pub fn dynamic_defaults() -> Self {
        Self {
            field_of_view_rear: 250.0,
            field_of_view_front: 250.0,
            reaction_time: Some(0.3),
        }
    }

    /// Defaults for static obstacles: no view, no reaction time.
    pub fn static_defaults() -> Self {
        Self {
            field_of_view_rear: 0.0,
            field_of_view_front: 0.0,
            reaction_time: None,
        }
    }

    /// Rear field-of-view distance in metres.
    pub fn field_of_view_rear(&self) -> f64 {
        self.field_of_view_rear
    }

    /// Front field-of-view distance in metres.
    pub fn field_of_view_front(&self) -> f64 {
        self.field_of_view_front
    }

    /// Reaction time in seconds, if the obstacle reacts at all.
    pub fn reaction_time(&self) -> Option<f64> {
        self.reaction_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn presets_pass_validation() {
        for p in [
            ActuatorParameters::vehicle_defaults(),
            ActuatorParameters::ego_defaults(),
            ActuatorParameters::pedestrian_defaults(),
            ActuatorParameters::static_defaults(),
        ] {
            let rebuilt = ActuatorParameters::new(
                p.v_max(),
                p.a_max(),
                p.a_max_long(),
                p.a_min_long(),
                p.a_braking(),
            )
            .unwrap();
            assert_eq!(rebuilt, p);
        }
    }

    #[test]
    fn negative_max_velocity_rejected() {
        let err = ActuatorParameters::new(-1.0, 5.0, 5.0, -10.0, -10.0).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::InvalidValue { name: "v_max", .. }
        ));
    }

    #[test]
    fn positive_braking_rejected() {
        let err = ActuatorParameters::new(10.0, 5.0, 5.0, -10.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::InvalidValue {
                name: "a_braking",
                ..
            }
        ));
    }

    #[test]
    fn long_acceleration_above_total_rejected() {
        let err = ActuatorParameters::new(10.0, 3.0, 5.0, -10.0, -10.0).unwrap_err();
        assert!(matches!(err, ParameterError::Inconsistent { .. }));
    }

    #[test]
    fn braking_stronger_than_min_long_rejected() {
        let err = ActuatorParameters::new(10.0, 5.0, 5.0, -5.0, -8.0).unwrap_err();
        assert!(matches!(err, ParameterError::Inconsistent { .. }));
    }

    #[test]
    fn pedestrian_is_symmetric() {
        let p = ActuatorParameters::pedestrian(1.5, 0.8).unwrap();
        assert_eq!(p.a_max_long(), 0.8);
        assert_eq!(p.a_min_long(), -0.8);
        assert_eq!(p.a_braking(), -0.8);
    }

    #[test]
    fn nan_rejected() {
        assert!(ActuatorParameters::new(f64::NAN, 5.0, 5.0, -10.0, -10.0).is_err());
        assert!(SensorParameters::new(250.0, f64::NAN, None).is_err());
    }

    #[test]
    fn sensor_reaction_time_must_be_non_negative() {
        assert!(SensorParameters::new(10.0, 10.0, Some(-0.1)).is_err());
        let s = SensorParameters::new(10.0, 20.0, None).unwrap();
        assert_eq!(s.reaction_time(), None);
        assert_eq!(s.field_of_view_front(), 20.0);
    }

    #[test]
    fn static_sensor_has_no_reaction() {
        let s = SensorParameters::static_defaults();
        assert_eq!(s.reaction_time(), None);
        assert_eq!(s.field_of_view_rear(), 0.0);
    }

    proptest! {
        #[test]
        fn accepted_values_satisfy_constraints(
            v in -5.0f64..60.0,
            a in -1.0f64..10.0,
            along in -1.0f64..10.0,
            amin in -12.0f64..1.0,
            abrake in -12.0f64..1.0,
        ) {
            if let Ok(p) = ActuatorParameters::new(v, a, along, amin, abrake) {
                prop_assert!(p.v_max() >= 0.0);
                prop_assert!(p.a_max_long() <= p.a_max());
                prop_assert!(p.a_min_long() <= 0.0);
                prop_assert!(p.a_braking().abs() <= p.a_min_long().abs());
            }
        }
    }
}
