use scenesim::configuration::config::{FlightSceneConfig, OrbitalSceneConfig, SceneConfig};
use scenesim::scene::{setup, FlightScene, OrbitalScene, Scene};
use scenesim::simulation::states::{Motion, NVec3};
use scenesim::SceneError;

const SOLAR_SYSTEM: &str = include_str!("../scenarios/solar_system.yaml");
const BIRD_FLIGHT: &str = include_str!("../scenarios/bird_flight.yaml");
const BIRD_KEYFRAMES: &str = include_str!("../scenarios/bird_keyframes.yaml");

const FRAME: f64 = 1.0 / 60.0;

fn orbital(text: &str) -> OrbitalSceneConfig {
    match SceneConfig::from_yaml(text).unwrap() {
        SceneConfig::Orbital(cfg) => cfg,
        other => panic!("expected an orbital scene, got {other:?}"),
    }
}

fn flight(text: &str) -> FlightSceneConfig {
    match SceneConfig::from_yaml(text).unwrap() {
        SceneConfig::Flight(cfg) => cfg,
        other => panic!("expected a flight scene, got {other:?}"),
    }
}

/// Smallest flight scene: four keyframes, one interpolable segment over [1, 2)
fn short_flight(extra: &str) -> String {
    format!(
        "scene: flight
{extra}
track:
  keyframes:
    - {{ p: [0.0, 0.0, 0.0], t: 0.0 }}
    - {{ p: [1.0, 0.0, 0.0], t: 1.0 }}
    - {{ p: [2.0, 1.0, 0.0], t: 2.0 }}
    - {{ p: [3.0, 1.0, 0.0], t: 3.0 }}
"
    )
}

// ==================================================================================
// Shipped scene files
// ==================================================================================

#[test]
fn shipped_scenes_start() {
    for (file, text) in [
        ("solar_system", SOLAR_SYSTEM),
        ("bird_flight", BIRD_FLIGHT),
        ("bird_keyframes", BIRD_KEYFRAMES),
    ] {
        let cfg = SceneConfig::from_yaml(text).unwrap();
        let mut scene = setup(&cfg).unwrap_or_else(|e| panic!("{file}: {e}"));
        let frame = scene.advance_and_get_transforms(FRAME).unwrap();
        assert!(!frame.transforms.is_empty(), "{file} produced no transforms");
    }
}

#[test]
fn loop_and_explicit_keyframes_describe_the_same_track() {
    let looped = FlightScene::from_config(&flight(BIRD_FLIGHT)).unwrap();
    let explicit = FlightScene::from_config(&flight(BIRD_KEYFRAMES)).unwrap();

    assert_eq!(looped.track().keyframes(), explicit.track().keyframes());
    assert_eq!(looped.track().tension(), 0.1);
}

#[test]
fn solar_system_runs_and_stays_bound() {
    let mut scene = OrbitalScene::from_config(&orbital(SOLAR_SYSTEM)).unwrap();
    let g = scene.scenario().parameters.G;
    assert!((g - 0.448390).abs() < 1e-5, "G = {g}");

    let mut frame = None;
    for _ in 0..200 {
        frame = Some(scene.advance_and_get_transforms(FRAME).unwrap());
    }
    let frame = frame.unwrap();
    assert!((frame.time - 2.0).abs() < 1e-9);
    assert_eq!(frame.transforms.len(), 11);

    let sun = frame.get("sun").unwrap();
    assert_eq!(sun.translation, NVec3::zeros());
    assert!((sun.scale - 0.069634 * 100.0).abs() < 1e-12);

    let (saturn, ring) = (frame.get("saturn").unwrap(), frame.get("saturn_ring").unwrap());
    assert_eq!(ring.translation, saturn.translation);
    assert_eq!(ring.linear, saturn.linear);

    for body in &scene.scenario().system.bodies {
        if let Some(a) = body.semi_major_axis {
            let d = body.x.norm();
            assert!(d > 0.7 * a && d < 1.3 * a, "{} at {d}, a = {a}", body.name);
        }
    }

    // the moon stays with the earth and has gone round it
    let earth = scene.scenario().system.body("earth").unwrap();
    let moon = scene.scenario().system.body("moon").unwrap();
    assert!((moon.x - earth.x).norm() < 0.1);
    assert!(scene.revolutions("moon").unwrap() >= 1);
    assert_eq!(scene.revolutions("neptune"), Some(0));
}

// ==================================================================================
// Flight scene
// ==================================================================================

#[test]
fn flight_trace_cleared_when_timer_wraps() {
    let mut scene = FlightScene::from_config(&flight(BIRD_KEYFRAMES)).unwrap();
    assert_eq!(scene.timer().t, 1.0);

    // scale 0.5: each 1 s frame moves 0.5 along [1, 7)
    for _ in 0..11 {
        scene.advance_and_get_transforms(1.0).unwrap();
    }
    assert_eq!(scene.trace().len(), 11);
    assert_eq!(scene.timer().t, 6.5);

    let frame = scene.advance_and_get_transforms(1.0).unwrap();
    assert_eq!(scene.timer().t, 1.0);
    assert_eq!(frame.time, 1.0);
    assert_eq!(scene.trace().len(), 1);
    assert_eq!(scene.position(), NVec3::new(0.0, 1.0, 0.0));
}

#[test]
fn flight_trace_keeps_latest_points() {
    let cfg = flight(&short_flight("trace_capacity: 5\nanimate_bird: false"));
    let mut scene = FlightScene::from_config(&cfg).unwrap();

    let mut positions = Vec::new();
    for _ in 0..9 {
        scene.advance_and_get_transforms(0.1).unwrap();
        positions.push(scene.position());
    }

    assert_eq!(scene.trace().capacity(), 5);
    let kept: Vec<NVec3> = scene.trace().points().copied().collect();
    assert_eq!(kept, positions[4..].to_vec());
}

#[test]
fn flight_frame_places_the_bird() {
    let mut scene = FlightScene::from_config(&flight(BIRD_FLIGHT)).unwrap();
    let frame = scene.advance_and_get_transforms(0.5).unwrap();

    // 0.5 s at scale 0.5
    assert!((frame.time - 1.25).abs() < 1e-12);
    assert_eq!(frame.transforms.len(), 9);

    let body = frame.get("body").unwrap();
    let expected = scene.track().interpolate_position(frame.time).unwrap();
    assert_eq!(body.translation, expected);

    // nose along the velocity, not upside down
    let forward = body.linear * NVec3::z();
    let v = scene.velocity().normalize();
    assert!((forward - v).norm() < 1e-9);
    assert!((body.linear * NVec3::y()).z >= -1e-12);
    assert!(frame.get("wing_hand_left").is_some());
}

#[test]
fn flight_without_bird_reports_one_node() {
    let cfg = flight(&short_flight("animate_bird: false"));
    let mut scene = FlightScene::from_config(&cfg).unwrap();
    let frame = scene.advance_and_get_transforms(0.0).unwrap();

    assert_eq!(frame.transforms.len(), 1);
    assert_eq!(frame.get("body").unwrap().translation, NVec3::new(1.0, 0.0, 0.0));
}

#[test]
fn negative_frame_time_is_rejected() {
    let cfg = flight(&short_flight("animate_bird: false"));
    let mut scene = FlightScene::from_config(&cfg).unwrap();
    assert!(matches!(
        scene.advance_and_get_transforms(-1.0),
        Err(SceneError::InvalidParameter { name: "elapsed", .. })
    ));
}

// ==================================================================================
// Malformed scenes
// ==================================================================================

#[test]
fn track_needs_exactly_one_form() {
    let neither = flight("scene: flight\ntrack: {}\n");
    assert!(matches!(
        FlightScene::from_config(&neither),
        Err(SceneError::InvalidParameter { name: "track", .. })
    ));

    let mut both = flight(BIRD_KEYFRAMES);
    both.track.closed_loop = flight(BIRD_FLIGHT).track.closed_loop;
    assert!(matches!(
        FlightScene::from_config(&both),
        Err(SceneError::InvalidParameter { name: "track", .. })
    ));
}

#[test]
fn oversized_trace_refuses_to_start() {
    for capacity in ["18446744073709551615", "1000000000000"] {
        let cfg = SceneConfig::from_yaml(&short_flight(&format!("trace_capacity: {capacity}"))).unwrap();
        assert!(matches!(
            setup(&cfg).err(),
            Some(SceneError::InvalidParameter { name: "trace_capacity", .. })
        ));
    }

    // a large but allowed trace does not reserve its full size up front
    let cfg = flight(&short_flight("trace_capacity: 100000\nanimate_bird: false"));
    let scene = FlightScene::from_config(&cfg).unwrap();
    assert_eq!(scene.trace().capacity(), 100_000);
    assert!(scene.trace().is_empty());
}

#[test]
fn short_keyframe_vector_refuses_to_start() {
    let text = "
scene: flight
track:
  keyframes:
    - { p: [0.0, 0.0, 0.0], t: 0.0 }
    - { p: [1.0, 0.0], t: 1.0 }
    - { p: [2.0, 1.0, 0.0], t: 2.0 }
    - { p: [3.0, 1.0, 0.0], t: 3.0 }
";
    let cfg = SceneConfig::from_yaml(text).unwrap();
    assert!(matches!(
        setup(&cfg).err(),
        Some(SceneError::InvalidParameter { name: "keyframes", .. })
    ));
}

#[test]
fn bad_tension_refuses_to_start() {
    let cfg = SceneConfig::from_yaml(&short_flight("tension: 2.0")).unwrap();
    assert_eq!(setup(&cfg).err(), Some(SceneError::InvalidTension(2.0)));
}

#[test]
fn missing_gravity_refuses_to_start() {
    let text = "
scene: orbital
parameters:
  h0: 0.01
bodies:
  - { name: sun, kind: star, radius: 1.0, m: 1.0 }
";
    let cfg = SceneConfig::from_yaml(text).unwrap();
    assert_eq!(setup(&cfg).err(), Some(SceneError::MissingGravity));
}

#[test]
fn malformed_bodies_refuse_to_start() {
    let base = "
scene: orbital
parameters:
  h0: 0.01
  G: 1.0
bodies:
  - { name: sun, kind: star, radius: 1.0, m: 1000.0 }
";
    let cases = [
        ("  - { name: p, kind: planet, radius: 0.1, m: 1.0, x: [10.0, 0.0] }", "short vector"),
        ("  - { name: p, kind: planet, radius: 0.1, x: [10.0, 0.0, 0.0] }", "missing mass"),
        ("  - { name: sun, kind: planet, radius: 0.1, m: 1.0, x: [10.0, 0.0, 0.0] }", "duplicate"),
        ("  - { name: r, kind: ring, radius: 0.1 }", "ring without parent"),
        ("  - { name: p, kind: planet, radius: -0.1, m: 1.0, x: [10.0, 0.0, 0.0] }", "negative radius"),
        ("  - { name: p, kind: planet, radius: 0.1, m: 1.0, x: [10.0, 0.0, 0.0], display_scale: 0.0 }", "zero display scale"),
        ("  - { name: m, kind: moon, radius: 0.1, m: 1.0, relative_to: later }\n  - { name: later, kind: planet, radius: 0.1, m: 1.0, x: [5.0, 0.0, 0.0] }", "parent listed later"),
    ];
    for (line, what) in cases {
        let cfg = SceneConfig::from_yaml(&format!("{base}{line}\n")).unwrap();
        assert!(
            matches!(setup(&cfg).err(), Some(SceneError::InvalidBody { .. })),
            "{what} was accepted"
        );
    }

    let unknown = format!("{base}  - {{ name: p, kind: planet, radius: 0.1, m: 1.0, x: [1.0, 0.0, 0.0], attractors: [vega] }}\n");
    let cfg = SceneConfig::from_yaml(&unknown).unwrap();
    assert_eq!(setup(&cfg).err(), Some(SceneError::UnknownBody("vega".to_string())));
}

#[test]
fn moon_placed_relative_to_its_planet() {
    let text = "
scene: orbital
parameters:
  h0: 0.001
  G: 1.0
bodies:
  - { name: sun, kind: star, radius: 1.0, m: 1000.0 }
  - { name: planet, kind: planet, radius: 0.1, m: 10.0, x: [10.0, 0.0, 0.0], v: [0.0, 10.0, 0.0] }
  - { name: moon, kind: moon, radius: 0.01, m: 0.1, relative_to: planet, x: [0.5, 0.0, 0.0], v: [0.0, 4.4, 0.0] }
";
    let scene = OrbitalScene::from_config(&orbital(text)).unwrap();
    let moon = scene.scenario().system.body("moon").unwrap();

    assert_eq!(moon.x, NVec3::new(10.5, 0.0, 0.0));
    assert!((moon.v - NVec3::new(0.0, 14.4, 0.0)).norm() < 1e-12);
    assert_eq!(moon.motion, Motion::Orbit { attractors: vec![0, 1] });
}
