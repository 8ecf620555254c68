//! Fixed wing driven through the full lifecycle.

use af_actuator::{
    ActError, ActModel, ActSrcLine, Actuator, FixedWing, InitContext, UniformFlow,
};
use af_core::{ActuatorId, Real, Vec3};
use af_interp::AirfoilCache;
use af_params::ActParser;
use serde_yaml::Mapping;
use std::f64::consts::PI;
use std::sync::Arc;

type Wing = ActModel<FixedWing, ActSrcLine>;

const WING: &str = r#"
type: FixedWingLine
num_points: 3
start: [0.0, 0.0, 0.0]
end: [0.0, 0.0, 10.0]
pitch: 5.0
epsilon_chord: [0.25, 0.25, 0.25]
span_locs: [0.0, 1.0]
chord: [2.0, 4.0]
airfoil_table: flat_plate
"#;

fn parser(label: &str, yaml: &str) -> ActParser {
    let instance: Mapping = serde_yaml::from_str(yaml).expect("valid yaml");
    ActParser::new(label, "FixedWingLine", instance, None)
}

fn parse(yaml: &str) -> Result<Wing, ActError> {
    Wing::from_parser(ActuatorId::from_index(0).expect("id"), &parser("W1", yaml))
}

fn ready(yaml: &str, cache: &mut AirfoilCache) -> Wing {
    let mut wing = parse(yaml).expect("parse");
    let mut ctx = InitContext {
        domain: None,
        airfoils: cache,
    };
    wing.init(&mut ctx).expect("init");
    wing
}

#[test]
fn chord_interpolated_along_span() {
    let wing = ready(WING, &mut AirfoilCache::with_builtins());
    assert_eq!(wing.meta().chord, vec![2.0, 3.0, 4.0]);
    assert_eq!(wing.data().grid.pos[1], Vec3::new(0.0, 0.0, 5.0));
}

#[test]
fn smoothing_scales_with_chord() {
    let wing = ready(WING, &mut AirfoilCache::with_builtins());
    let eps = &wing.data().grid.epsilon;
    assert!((eps[0] - Vec3::repeat(0.5)).norm() < 1e-12);
    assert!((eps[2] - Vec3::repeat(1.0)).norm() < 1e-12);
}

#[test]
fn lift_matches_flat_plate_theory() {
    let mut wing = ready(WING, &mut AirfoilCache::with_builtins());
    wing.step(&UniformFlow::new(Vec3::new(10.0, 0.0, 0.0), 1.225))
        .expect("step");

    let meta = wing.meta();
    for aoa in &meta.aoa {
        assert!((aoa.to_degrees() - 5.0).abs() < 1e-9);
    }
    // Trapezoidal planform area: 2.5 * 2 + 5 * 3 + 2.5 * 4 = 30
    let cl = 2.0 * PI * (5.0 as Real).to_radians().sin();
    let expected = 0.5 * 1.225 * 100.0 * 30.0 * cl;
    assert!((meta.lift - expected).abs() / expected < 1e-9);

    // Force on the fluid is opposite to lift (+y) and drag (+x).
    let total = wing.force_view().total_force();
    assert!(total.y < 0.0 && total.x < 0.0);
    assert!(total.z.abs() < 1e-9);
}

#[test]
fn fllc_disabled_leaves_velocity_untouched() {
    let mut wing = ready(WING, &mut AirfoilCache::with_builtins());
    let flow = UniformFlow::new(Vec3::new(10.0, 0.0, 0.0), 1.225);
    wing.step(&flow).expect("first step");
    wing.step(&flow).expect("second step");
    assert!(wing.meta().fllc.is_none());
    for v in &wing.meta().vel_rel {
        assert_eq!(*v, Vec3::new(10.0, 0.0, 0.0));
    }
}

#[test]
fn fllc_corrects_after_first_step() {
    // Smoothing wider than the optimal quarter chord.
    let yaml = format!("{WING}fllc: true\nfllc_relaxation: 0.5\n")
        .replace("num_points: 3", "num_points: 11")
        .replace("epsilon_chord: [0.25, 0.25, 0.25]", "epsilon_chord: [1.0, 1.0, 1.0]");
    let mut wing = ready(&yaml, &mut AirfoilCache::with_builtins());
    let flow = UniformFlow::new(Vec3::new(10.0, 0.0, 0.0), 1.225);

    wing.step(&flow).expect("first step");
    // The correction from step one is applied at step two.
    assert!(wing.meta().vel_rel.iter().all(|v| *v == Vec3::new(10.0, 0.0, 0.0)));
    let correction = wing.meta().fllc.as_ref().expect("fllc").max_correction();
    assert!(correction > 0.0);

    wing.step(&flow).expect("second step");
    assert!(wing.meta().vel_rel.iter().any(|v| *v != Vec3::new(10.0, 0.0, 0.0)));
    let scalars = wing.snapshot().scalars;
    assert!(scalars.contains_key("fllc_max_correction"));
}

#[test]
fn shared_airfoil_table() {
    let mut cache = AirfoilCache::with_builtins();
    let a = ready(WING, &mut cache);
    let b = ready(WING, &mut cache);
    let ta = a.meta().aflookup.as_ref().expect("table");
    let tb = b.meta().aflookup.as_ref().expect("table");
    assert!(Arc::ptr_eq(ta, tb));
}

#[test]
fn missing_smoothing_names_both_options() {
    let yaml = WING.replace("epsilon_chord: [0.25, 0.25, 0.25]\n", "");
    let msg = parse(&yaml).err().expect("must fail").to_string();
    assert!(msg.contains("'epsilon'") && msg.contains("'epsilon_chord'"), "{msg}");
}

#[test]
fn relaxation_without_fllc_is_rejected() {
    let yaml = format!("{WING}fllc_relaxation: 0.3\n");
    let msg = parse(&yaml).err().expect("must fail").to_string();
    assert!(msg.contains("'fllc_relaxation' requires 'fllc'"), "{msg}");
}

#[test]
fn relaxation_with_fllc_disabled_is_rejected() {
    let yaml = format!("{WING}fllc: false\nfllc_relaxation: 0.3\n");
    let err = parse(&yaml).err().expect("must fail");
    assert!(matches!(err, ActError::Configuration { .. }));
    assert!(err.to_string().contains("'fllc' is disabled"), "{err}");
}

#[test]
fn construction_is_deterministic() {
    let a = ready(WING, &mut AirfoilCache::with_builtins());
    let b = ready(WING, &mut AirfoilCache::with_builtins());
    let (ga, gb) = (&a.data().grid, &b.data().grid);
    assert_eq!(ga.pos, gb.pos);
    assert_eq!(ga.epsilon, gb.epsilon);
    assert_eq!(ga.orientation, gb.orientation);
    assert_eq!(a.info().bound_box, b.info().bound_box);
}

#[test]
fn bounding_box_holds_smoothing_support() {
    let yaml = WING
        .replace("epsilon_chord: [0.25, 0.25, 0.25]", "epsilon: [2.0, 2.0, 2.0]")
        .replace("chord: [2.0, 4.0]", "chord: [0.5, 0.5]");
    let wing = ready(&yaml, &mut AirfoilCache::with_builtins());
    let view = wing.force_view();
    for (p, eps) in view.pos.iter().zip(view.epsilon) {
        assert!((eps - Vec3::repeat(2.0)).norm() < 1e-12);
        let reach = eps * 3.0;
        assert!(view.bound_box.contains_point(&(p + reach)), "{p:?}");
        assert!(view.bound_box.contains_point(&(p - reach)), "{p:?}");
    }
}

#[test]
fn chord_table_mismatch_is_geometry_error() {
    let yaml = WING.replace("chord: [2.0, 4.0]", "chord: [2.0, 3.0, 4.0]");
    let err = parse(&yaml).err().expect("must fail");
    assert!(matches!(err, ActError::Geometry { .. }));
}

#[test]
fn single_point_wing_is_rejected() {
    let yaml = WING.replace("num_points: 3", "num_points: 1");
    let err = parse(&yaml).err().expect("must fail");
    assert!(err.to_string().contains("num_points"));
}

#[test]
fn missing_airfoil_file_fails_init() {
    let yaml = WING.replace("airfoil_table: flat_plate", "airfoil_table: /nonexistent/polar.txt");
    let mut wing = parse(&yaml).expect("parse");
    let mut cache = AirfoilCache::new();
    let mut ctx = InitContext {
        domain: None,
        airfoils: &mut cache,
    };
    let err = wing.init(&mut ctx).unwrap_err();
    assert!(matches!(err, ActError::Configuration { .. }));
}
