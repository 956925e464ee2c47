//! Classification enums for lanelets and road users.

use std::fmt;

/// Functional category of a lanelet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LaneletType {
    /// Controlled-access highway.
    Interstate,
    /// Urban road.
    Urban,
    /// Country road.
    Country,
    /// Road with no specific category.
    Highway,
    /// Part of a crosswalk.
    Crosswalk,
    /// Reserved for buses.
    BusLane,
    /// Reserved for bicycles.
    BicycleLane,
    /// Pedestrian sidewalk.
    Sidewalk,
    /// Lanelet inside an intersection area.
    Intersection,
    /// Lanelet leading into an intersection.
    Incoming,
    /// Emergency shoulder.
    Shoulder,
    /// Road border strip; never part of an assembled lane.
    Border,
    /// Main carriageway of an interstate.
    MainCarriageWay,
    /// Interstate entrance ramp.
    AccessRamp,
    /// Interstate exit ramp.
    ExitRamp,
    /// Private driveway.
    DriveWay,
    /// Parking area.
    Parking,
    /// Unclassified.
    Unknown,
}

/// Agent categories that may use a lanelet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoadUser {
    /// Any motor vehicle.
    Vehicle,
    /// Passenger car.
    Car,
    /// Truck.
    Truck,
    /// Bus.
    Bus,
    /// Motorcycle.
    Motorcycle,
    /// Bicycle.
    Bicycle,
    /// Pedestrian.
    Pedestrian,
    /// Priority vehicle (emergency services).
    PriorityVehicle,
    /// Train or tram.
    Train,
    /// Taxi.
    Taxi,
}

/// Border marking of a lanelet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineMarking {
    /// Solid line.
    Solid,
    /// Dashed line.
    Dashed,
    /// Broad solid line.
    BroadSolid,
    /// Broad dashed line.
    BroadDashed,
    /// No marking.
    NoMarking,
    /// Marking not known.
    #[default]
    Unknown,
}

/// Relative driving direction of an adjacent lanelet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrivingDirection {
    /// Same direction of travel.
    Same,
    /// Opposite direction of travel.
    Opposite,
}

/// Turning direction of an outgoing lanelet relative to an incoming one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurningDirection {
    /// Straight through the intersection.
    Straight,
    /// Left turn.
    Left,
    /// Right turn.
    Right,
}

impl fmt::Display for LaneletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for RoadUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
