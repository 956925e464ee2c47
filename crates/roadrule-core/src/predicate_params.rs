//! Named numeric thresholds shared by predicate implementations.
//!
//! [`PredicateParameters`] is a closed table: the set of names is fixed
//! at construction and only values can change. Reading or writing a name
//! outside the table is an error rather than a silent insert, so typos in
//! rule configuration surface immediately.

use std::f64::consts::PI;

use indexmap::IndexMap;

use crate::error::ParameterError;

/// Default parameter table: `(name, value)`.
const DEFAULTS: &[(&str, f64)] = &[
    ("aAbrupt", -2.0),
    ("jAbrupt", -2.0),
    ("standstillError", 0.1),
    ("minVelocityDif", 15.0),
    ("numVehCongestion", 3.0),
    ("maxCongestionVelocity", 2.78),
    ("numVehSlowMovingTraffic", 3.0),
    ("maxSlowMovingTrafficVelocity", 8.33),
    ("numVehQueueOfVehicles", 3.0),
    ("maxQueueOfVehiclesVelocity", 3.0),
    ("maxVelocityLimitFreeDriving", 16.67),
    ("minInterstateWidth", 7.0),
    ("closeToLaneBorder", 0.2),
    ("closeToOtherVehicle", 0.5),
    ("slightlyHigherSpeedDifference", 5.55),
    ("uTurnLower", 0.25 * PI),
    ("uTurnUpper", 0.75 * PI),
    ("aboveCenterlineTh", 0.1),
    ("epsilon", 1e-6),
    ("stopLineDistance", 1.0),
    ("laneMatchingOrientation", 0.35),
    ("minSafetyDistance", 5.0),
    ("closeToBicycle", 6.0),
    ("narrowRoad", 5.5),
    ("maxPositiveDouble", f64::MAX),
    ("desiredInterstateVelocity", 36.11),
    ("fovSpeedLimit", 50.0),
    ("brakingSpeedLimit", 43.0),
    ("roadConditionSpeedLimit", 50.0),
    ("dBrakingIntersection", 15.0),
    ("aBrakingIntersection", -1.0),
    ("dMinUrban", 1.5),
    ("dMinNonUrban", 2.0),
    ("laneletOccupancySimilarity", 0.25),
    ("intersectionBrakingPossible", -4.0),
    ("closeToIntersectionMaxDistance", 30.0),
];

/// Closed name-to-value table of predicate thresholds.
///
/// Iteration order is the order of the default table.
#[derive(Clone, Debug, PartialEq)]
pub struct PredicateParameters {
    values: IndexMap<&'static str, f64>,
}

impl Default for PredicateParameters {
    fn default() -> Self {
        Self {
            values: DEFAULTS.iter().copied().collect(),
        }
    }
}

impl PredicateParameters {
    /// Look up a parameter value.
    pub fn get(&self, name: &str) -> Result<f64, ParameterError> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| ParameterError::UnknownParameter { name: name.into() })
    }

    /// Overwrite an existing parameter value. NaN is rejected.
    pub fn update(&mut self, name: &str, value: f64) -> Result<(), ParameterError> {
        let (_, key, slot) = self
            .values
            .get_full_mut(name)
            .ok_or_else(|| ParameterError::UnknownParameter { name: name.into() })?;
        if value.is_nan() {
            return Err(ParameterError::InvalidValue {
                name: *key,
                value,
                constraint: "a number",
            });
        }
        *slot = value;
        Ok(())
    }

    /// Number of parameters in the table.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; the table is never empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(name, value)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_present() {
        let p = PredicateParameters::default();
        assert_eq!(p.get("standstillError").unwrap(), 0.1);
        assert_eq!(p.get("aAbrupt").unwrap(), -2.0);
        assert!((p.get("uTurnUpper").unwrap() - 0.75 * PI).abs() < 1e-12);
        assert_eq!(p.len(), DEFAULTS.len());
    }

    #[test]
    fn unknown_name_is_an_error() {
        let mut p = PredicateParameters::default();
        assert!(matches!(
            p.get("noSuchThing"),
            Err(ParameterError::UnknownParameter { .. })
        ));
        assert!(p.update("noSuchThing", 1.0).is_err());
        assert_eq!(p.len(), DEFAULTS.len());
    }

    #[test]
    fn update_overwrites() {
        let mut p = PredicateParameters::default();
        p.update("closeToLaneBorder", 0.4).unwrap();
        assert_eq!(p.get("closeToLaneBorder").unwrap(), 0.4);
    }

    #[test]
    fn nan_update_rejected() {
        let mut p = PredicateParameters::default();
        assert!(p.update("epsilon", f64::NAN).is_err());
        assert_eq!(p.get("epsilon").unwrap(), 1e-6);
    }

    #[test]
    fn iteration_follows_table_order() {
        let p = PredicateParameters::default();
        let first = p.iter().next().unwrap();
        assert_eq!(first, ("aAbrupt", -2.0));
    }
}
