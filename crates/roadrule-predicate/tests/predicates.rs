//! Built-in predicates evaluated on the two-lane fixture road.

use std::sync::Arc;

use roadrule_core::{LaneletId, PredicateParameters, TimeStep};
use roadrule_network::RoadNetwork;
use roadrule_obstacle::Obstacle;
use roadrule_predicate::{
    EvaluationContext, EvaluationError, EvaluationMode, InFrontOf, InSameLane, InStandstill,
    LanePredicate, Predicate, PredicateRegistry, SafeDistance,
};
use roadrule_test_utils::fixtures::two_lane_road;
use roadrule_test_utils::VehicleBuilder;

const T0: TimeStep = TimeStep(0);

/// Vehicle on lanelet 1 with 5 m length, `a_min_long = -10`, no reaction time.
fn car(id: u64, x: f64, velocity: f64) -> Obstacle {
    VehicleBuilder::new(id)
        .at(x, 0.0)
        .velocity(velocity)
        .braking(-10.0, 3.0)
        .reaction_time(Some(0.0))
        .build()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

struct Scene {
    network: RoadNetwork,
    obstacles: Vec<Arc<Obstacle>>,
    params: PredicateParameters,
}

impl Scene {
    fn new(obstacles: Vec<Obstacle>) -> Self {
        Self {
            network: two_lane_road(),
            obstacles: obstacles.into_iter().map(Arc::new).collect(),
            params: PredicateParameters::default(),
        }
    }

    fn ctx(&self) -> EvaluationContext<'_> {
        EvaluationContext::new(&self.network, &self.obstacles, &self.params, 0.1)
    }

    fn k(&self) -> &Obstacle {
        &self.obstacles[0]
    }

    fn p(&self) -> Option<&Obstacle> {
        self.obstacles.get(1).map(|o| o.as_ref())
    }
}

#[test]
fn in_lane_compares_lanelet_sequences() {
    let network = two_lane_road();
    let a = network.intern_lane(vec![LaneletId(1)]).unwrap();
    let a_again = network.intern_lane(vec![LaneletId(1)]).unwrap();
    let b = network.intern_lane(vec![LaneletId(2)]).unwrap();
    let in_lane = roadrule_predicate::InLane;
    assert!(in_lane.boolean_evaluation(&a, &a_again).unwrap());
    assert!(!in_lane.boolean_evaluation(&a, &b).unwrap());
}

#[test]
fn safe_distance_with_matching_speeds() {
    let scene = Scene::new(vec![car(1, 50.0, 20.0), car(2, 70.0, 20.0)]);
    let robust = SafeDistance
        .robust_evaluation(T0, &scene.ctx(), scene.k(), scene.p())
        .unwrap();
    assert!(close(robust, 15.0), "robust = {robust}");
    assert!(SafeDistance
        .boolean_evaluation(T0, &scene.ctx(), scene.k(), scene.p())
        .unwrap());
}

#[test]
fn safe_distance_violated_behind_standing_vehicle() {
    let scene = Scene::new(vec![car(1, 70.0, 20.0), car(2, 80.0, 0.0)]);
    let robust = SafeDistance
        .robust_evaluation(T0, &scene.ctx(), scene.k(), scene.p())
        .unwrap();
    assert!(close(robust, -15.0), "robust = {robust}");
    assert!(!SafeDistance
        .boolean_evaluation(T0, &scene.ctx(), scene.k(), scene.p())
        .unwrap());
    let c = SafeDistance
        .constraint_evaluation(T0, &scene.ctx(), scene.k(), scene.p())
        .unwrap();
    // rear of P (77.5) - half of K (2.5) - d_safe (20)
    assert!(close(c.real_valued_constraint, 55.0));
}

#[test]
fn safe_distance_holds_when_leader_is_behind() {
    let scene = Scene::new(vec![car(1, 58.0, 20.0), car(2, 50.0, 20.0)]);
    assert!(SafeDistance
        .boolean_evaluation(T0, &scene.ctx(), scene.k(), scene.p())
        .unwrap());
}

#[test]
fn safe_distance_needs_second_obstacle() {
    let scene = Scene::new(vec![car(1, 50.0, 20.0)]);
    assert_eq!(
        SafeDistance.boolean_evaluation(T0, &scene.ctx(), scene.k(), None),
        Err(EvaluationError::MissingOperand {
            predicate: "safe_distance".into()
        })
    );
}

#[test]
fn in_front_of_measures_gap() {
    let scene = Scene::new(vec![car(1, 50.0, 10.0), car(2, 60.0, 10.0)]);
    let ctx = scene.ctx();
    let gap = InFrontOf.robust_evaluation(T0, &ctx, scene.k(), scene.p()).unwrap();
    assert!(close(gap, 5.0));
    assert!(InFrontOf.boolean_evaluation(T0, &ctx, scene.k(), scene.p()).unwrap());
    let c = InFrontOf
        .constraint_evaluation(T0, &ctx, scene.k(), scene.p())
        .unwrap();
    assert!(close(c.real_valued_constraint, 55.0));

    let swapped = [scene.obstacles[1].as_ref(), scene.obstacles[0].as_ref()];
    assert!(!InFrontOf
        .boolean_evaluation(T0, &ctx, swapped[0], Some(swapped[1]))
        .unwrap());
}

#[test]
fn in_same_lane_follows_lateral_offset() {
    let same = Scene::new(vec![car(1, 50.0, 10.0), car(2, 70.0, 10.0)]);
    assert!(InSameLane
        .boolean_evaluation(T0, &same.ctx(), same.k(), same.p())
        .unwrap());

    let beside = Scene::new(vec![
        car(1, 50.0, 10.0),
        VehicleBuilder::new(2).at(70.0, 4.0).velocity(10.0).build(),
    ]);
    assert!(!InSameLane
        .boolean_evaluation(T0, &beside.ctx(), beside.k(), beside.p())
        .unwrap());
}

#[test]
fn topological_predicates_reject_numeric_forms() {
    let scene = Scene::new(vec![car(1, 50.0, 10.0), car(2, 70.0, 10.0)]);
    let err = InSameLane
        .robust_evaluation(T0, &scene.ctx(), scene.k(), scene.p())
        .unwrap_err();
    assert_eq!(
        err,
        EvaluationError::Unsupported {
            predicate: "in_same_lane".into(),
            mode: EvaluationMode::Robust
        }
    );
    assert!(InSameLane
        .constraint_evaluation(T0, &scene.ctx(), scene.k(), scene.p())
        .is_err());
    assert!(InStandstill
        .constraint_evaluation(T0, &scene.ctx(), scene.k(), None)
        .is_err());
}

#[test]
fn standstill_uses_parameter_threshold() {
    let mut scene = Scene::new(vec![car(1, 50.0, 0.05)]);
    let ctx = scene.ctx();
    assert!(InStandstill.boolean_evaluation(T0, &ctx, scene.k(), None).unwrap());
    let robust = InStandstill.robust_evaluation(T0, &ctx, scene.k(), None).unwrap();
    assert!(close(robust, 0.05));

    scene.params.update("standstillError", 0.01).unwrap();
    assert!(!InStandstill
        .boolean_evaluation(T0, &scene.ctx(), scene.k(), None)
        .unwrap());
}

#[test]
fn registry_records_satisfaction() {
    let scene = Scene::new(vec![car(1, 50.0, 20.0), car(2, 70.0, 20.0)]);
    let registry = PredicateRegistry::with_defaults();
    let ctx = scene.ctx();
    assert!(registry
        .boolean("safe_distance", T0, &ctx, scene.k(), scene.p())
        .unwrap());
    assert!(!registry
        .boolean("in_standstill", T0, &ctx, scene.k(), None)
        .unwrap());
    assert!(registry
        .robust("in_same_lane", T0, &ctx, scene.k(), scene.p())
        .is_err());

    let sd = registry.statistics("safe_distance").unwrap();
    assert_eq!((sd.num_executions, sd.num_satisfaction), (1, 1));
    let st = registry.statistics("in_standstill").unwrap();
    assert_eq!((st.num_executions, st.num_satisfaction), (1, 0));
    assert_eq!(registry.statistics("in_same_lane").unwrap().num_executions, 0);
}
