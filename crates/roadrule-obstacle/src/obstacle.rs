//! [`Obstacle`] and its builder.

use std::collections::BTreeMap;
use std::fmt;

use roadrule_core::{ActuatorParameters, ObstacleId, SensorParameters, TimeStep};
use roadrule_geometry::{Polygon, Shape};

use crate::cache::ObstacleCaches;
use crate::error::ObstacleError;
use crate::state::{SignalState, State};

/// How an obstacle takes part in the scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleRole {
    /// Never moves. Its current state is valid at every time step.
    Static,
    /// Moves along a trajectory.
    Dynamic,
    /// Part of the environment, e.g. a building.
    Environment,
    /// Hypothetical participant, e.g. hidden behind an occlusion.
    Phantom,
}

impl fmt::Display for ObstacleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
            Self::Environment => "environment",
            Self::Phantom => "phantom",
        };
        f.write_str(s)
    }
}

/// Kind of traffic participant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ObstacleType {
    Car,
    Truck,
    Bus,
    Motorcycle,
    Bicycle,
    Pedestrian,
    PriorityVehicle,
    Train,
    ParkedVehicle,
    ConstructionZone,
    RoadBoundary,
    #[default]
    Unknown,
}

// ── Obstacle ───────────────────────────────────────────────────────

/// A traffic participant with a fixed trajectory.
///
/// The trajectory is split into history (before the current state), the
/// current state, and the prediction (after it). All derived quantities
/// are memoized; see the crate documentation.
///
/// `Obstacle` is `Send + Sync`. Share it behind an `Arc` when several
/// worker threads evaluate predicates on it.
#[derive(Debug)]
pub struct Obstacle {
    id: ObstacleId,
    role: ObstacleRole,
    obstacle_type: ObstacleType,
    shape: Shape,
    actuator: ActuatorParameters,
    sensor: SensorParameters,
    current: State,
    history: BTreeMap<TimeStep, State>,
    prediction: BTreeMap<TimeStep, State>,
    signals: BTreeMap<TimeStep, SignalState>,
    field_of_view: Option<Polygon>,
    pub(crate) caches: ObstacleCaches,
}

impl Obstacle {
    /// Unique id.
    pub fn id(&self) -> ObstacleId {
        self.id
    }

    /// Role in the scenario.
    pub fn role(&self) -> ObstacleRole {
        self.role
    }

    /// `true` for [`ObstacleRole::Static`].
    pub fn is_static(&self) -> bool {
        self.role == ObstacleRole::Static
    }

    /// Kind of participant.
    pub fn obstacle_type(&self) -> ObstacleType {
        self.obstacle_type
    }

    /// Geometric shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Actuator limits.
    pub fn actuator(&self) -> &ActuatorParameters {
        &self.actuator
    }

    /// Sensor limits.
    pub fn sensor(&self) -> &SensorParameters {
        &self.sensor
    }

    /// The current state.
    pub fn current_state(&self) -> &State {
        &self.current
    }

    /// Past states, keyed by time step.
    pub fn history(&self) -> &BTreeMap<TimeStep, State> {
        &self.history
    }

    /// Predicted states, keyed by time step.
    pub fn prediction(&self) -> &BTreeMap<TimeStep, State> {
        &self.prediction
    }

    /// Field-of-view polygon, if known.
    pub fn field_of_view(&self) -> Option<&Polygon> {
        self.field_of_view.as_ref()
    }

    /// Earliest time step with a state.
    pub fn first_time_step(&self) -> TimeStep {
        self.history
            .keys()
            .next()
            .copied()
            .unwrap_or(self.current.time_step)
    }

    /// Latest time step with a state.
    pub fn final_time_step(&self) -> TimeStep {
        self.prediction
            .keys()
            .next_back()
            .copied()
            .unwrap_or(self.current.time_step)
    }

    /// `true` if `time_step` lies within the trajectory's time span.
    pub fn time_step_exists(&self, time_step: TimeStep) -> bool {
        self.first_time_step() <= time_step && time_step <= self.final_time_step()
    }

    /// State at `time_step`.
    ///
    /// Static obstacles report their current state at every time step.
    pub fn state_at(&self, time_step: TimeStep) -> Result<&State, ObstacleError> {
        if time_step == self.current.time_step {
            return Ok(&self.current);
        }
        self.prediction
            .get(&time_step)
            .or_else(|| self.history.get(&time_step))
            .or(self.is_static().then_some(&self.current))
            .ok_or(ObstacleError::MissingState {
                obstacle: self.id,
                time_step,
            })
    }

    /// Signal state at `time_step`, if recorded.
    pub fn signal_state_at(&self, time_step: TimeStep) -> Option<&SignalState> {
        self.signals.get(&time_step)
    }

    /// Time steps with a state, in ascending order.
    pub fn time_steps(&self) -> impl Iterator<Item = TimeStep> + '_ {
        self.history
            .keys()
            .copied()
            .chain(std::iter::once(self.current.time_step))
            .chain(self.prediction.keys().copied())
    }

    /// Shape placed at the state of `time_step`.
    pub fn occupancy_polygon(&self, time_step: TimeStep) -> Result<Polygon, ObstacleError> {
        let state = self.state_at(time_step)?;
        self.shape
            .occupancy(state.position, state.orientation)
            .map_err(|source| ObstacleError::Geometry {
                obstacle: self.id,
                source,
            })
    }

    /// Finite-difference acceleration `(v[t] - v[t-1]) / dt`, or `0.0`
    /// when there is no state at `t - 1`.
    pub fn interpolate_acceleration(
        &self,
        time_step: TimeStep,
        dt: f64,
    ) -> Result<f64, ObstacleError> {
        let current = self.state_at(time_step)?;
        let previous = match time_step.prev() {
            Some(prev) if self.time_step_exists(prev) => self.state_at(prev)?,
            _ => return Ok(0.0),
        };
        Ok((current.velocity - previous.velocity) / dt)
    }
}

// ── ObstacleBuilder ────────────────────────────────────────────────

/// Incremental constructor for [`Obstacle`].
///
/// Actuator and sensor limits default by role: static obstacles get the
/// all-zero [`ActuatorParameters::static_defaults`] and
/// [`SensorParameters::static_defaults`], everything else
/// [`ActuatorParameters::vehicle_defaults`] and
/// [`SensorParameters::dynamic_defaults`].
///
/// # Examples
///
/// ```
/// use roadrule_core::{ObstacleId, TimeStep};
/// use roadrule_geometry::{Point, Shape};
/// use roadrule_obstacle::{ObstacleBuilder, ObstacleRole, State};
///
/// let obstacle = ObstacleBuilder::new(ObstacleId(1), ObstacleRole::Static)
///     .shape(Shape::rectangle(4.0, 2.0).unwrap())
///     .current_state(State::at_rest(TimeStep(0), Point::new(3.0, 0.0), 0.0))
///     .build()
///     .unwrap();
/// assert_eq!(obstacle.actuator().v_max(), 0.0);
/// assert!(obstacle.state_at(TimeStep(7)).is_ok());
/// ```
#[derive(Debug)]
pub struct ObstacleBuilder {
    id: ObstacleId,
    role: ObstacleRole,
    obstacle_type: ObstacleType,
    shape: Shape,
    actuator: Option<ActuatorParameters>,
    sensor: Option<SensorParameters>,
    current: Option<State>,
    states: Vec<State>,
    signals: BTreeMap<TimeStep, SignalState>,
    field_of_view: Option<Polygon>,
}

impl ObstacleBuilder {
    /// Start building obstacle `id`. The shape defaults to a 5 m × 2 m
    /// rectangle.
    pub fn new(id: ObstacleId, role: ObstacleRole) -> Self {
        Self {
            id,
            role,
            obstacle_type: ObstacleType::default(),
            shape: Shape::Rectangle {
                length: 5.0,
                width: 2.0,
            },
            actuator: None,
            sensor: None,
            current: None,
            states: Vec::new(),
            signals: BTreeMap::new(),
            field_of_view: None,
        }
    }

    /// Set the participant kind.
    pub fn obstacle_type(mut self, obstacle_type: ObstacleType) -> Self {
        self.obstacle_type = obstacle_type;
        self
    }

    /// Set the shape.
    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Override the actuator limits.
    pub fn actuator(mut self, actuator: ActuatorParameters) -> Self {
        self.actuator = Some(actuator);
        self
    }

    /// Override the sensor limits.
    pub fn sensor(mut self, sensor: SensorParameters) -> Self {
        self.sensor = Some(sensor);
        self
    }

    /// Set the current state. States added with [`state`](Self::state)
    /// before it become history, states after it the prediction.
    pub fn current_state(mut self, state: State) -> Self {
        self.current = Some(state);
        self
    }

    /// Add a trajectory state.
    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Add several trajectory states.
    pub fn states(mut self, states: impl IntoIterator<Item = State>) -> Self {
        self.states.extend(states);
        self
    }

    /// Record a signal state.
    pub fn signal(mut self, time_step: TimeStep, signal: SignalState) -> Self {
        self.signals.insert(time_step, signal);
        self
    }

    /// Set the field-of-view polygon.
    pub fn field_of_view(mut self, fov: Polygon) -> Self {
        self.field_of_view = Some(fov);
        self
    }

    /// Validate and build.
    ///
    /// Without an explicit current state the earliest trajectory state
    /// becomes current. Fails with [`ObstacleError::MissingState`] when
    /// there is no state at all. A later state for an already used time
    /// step replaces the earlier one.
    pub fn build(self) -> Result<Obstacle, ObstacleError> {
        let mut states = self.states;
        states.sort_by_key(|s| s.time_step);
        let current = match self.current {
            Some(c) => c,
            None if !states.is_empty() => states.remove(0),
            None => {
                return Err(ObstacleError::MissingState {
                    obstacle: self.id,
                    time_step: TimeStep::default(),
                })
            }
        };
        let mut history = BTreeMap::new();
        let mut prediction = BTreeMap::new();
        for state in states {
            if state.time_step < current.time_step {
                history.insert(state.time_step, state);
            } else if state.time_step > current.time_step {
                prediction.insert(state.time_step, state);
            }
        }
        let (actuator, sensor) = match self.role {
            ObstacleRole::Static => (
                ActuatorParameters::static_defaults(),
                SensorParameters::static_defaults(),
            ),
            _ => (
                ActuatorParameters::vehicle_defaults(),
                SensorParameters::dynamic_defaults(),
            ),
        };
        Ok(Obstacle {
            id: self.id,
            role: self.role,
            obstacle_type: self.obstacle_type,
            shape: self.shape,
            actuator: self.actuator.unwrap_or(actuator),
            sensor: self.sensor.unwrap_or(sensor),
            current,
            history,
            prediction,
            signals: self.signals,
            field_of_view: self.field_of_view,
            caches: ObstacleCaches::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadrule_geometry::Point;

    fn moving(t: u64, x: f64, v: f64) -> State {
        State {
            time_step: TimeStep(t),
            position: Point::new(x, 0.0),
            velocity: v,
            acceleration: 0.0,
            orientation: 0.0,
        }
    }

    fn dynamic() -> Obstacle {
        ObstacleBuilder::new(ObstacleId(4), ObstacleRole::Dynamic)
            .states([moving(2, 20.0, 12.0), moving(0, 0.0, 10.0), moving(1, 10.0, 11.0)])
            .current_state(moving(1, 10.0, 11.0))
            .build()
            .unwrap()
    }

    #[test]
    fn trajectory_split_around_current() {
        let o = dynamic();
        assert_eq!(o.first_time_step(), TimeStep(0));
        assert_eq!(o.final_time_step(), TimeStep(2));
        assert_eq!(o.history().len(), 1);
        assert_eq!(o.prediction().len(), 1);
        assert_eq!(
            o.time_steps().collect::<Vec<_>>(),
            vec![TimeStep(0), TimeStep(1), TimeStep(2)]
        );
        assert!(o.time_step_exists(TimeStep(2)));
        assert!(!o.time_step_exists(TimeStep(3)));
    }

    #[test]
    fn missing_state_reported() {
        let o = dynamic();
        assert_eq!(
            o.state_at(TimeStep(9)).unwrap_err(),
            ObstacleError::MissingState {
                obstacle: ObstacleId(4),
                time_step: TimeStep(9)
            }
        );
    }

    #[test]
    fn role_defaults() {
        let o = dynamic();
        assert_eq!(o.actuator(), &ActuatorParameters::vehicle_defaults());
        assert_eq!(o.sensor().reaction_time(), Some(0.3));
        let s = ObstacleBuilder::new(ObstacleId(5), ObstacleRole::Static)
            .current_state(State::at_rest(TimeStep(0), Point::new(0.0, 0.0), 0.0))
            .build()
            .unwrap();
        assert_eq!(s.actuator(), &ActuatorParameters::static_defaults());
        assert_eq!(s.sensor().reaction_time(), None);
        assert_eq!(s.state_at(TimeStep(100)).unwrap().position, Point::new(0.0, 0.0));
    }

    #[test]
    fn acceleration_by_difference() {
        let o = dynamic();
        assert_eq!(o.interpolate_acceleration(TimeStep(0), 0.1).unwrap(), 0.0);
        assert!((o.interpolate_acceleration(TimeStep(2), 0.1).unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_trajectory_rejected() {
        assert!(ObstacleBuilder::new(ObstacleId(1), ObstacleRole::Dynamic)
            .build()
            .is_err());
    }

    #[test]
    fn occupancy_polygon_follows_state() {
        let o = dynamic();
        let p = o.occupancy_polygon(TimeStep(2)).unwrap();
        assert!(p.contains_point(Point::new(22.0, 0.5)));
        assert!(!p.contains_point(Point::new(10.0, 0.0)));
    }
}
