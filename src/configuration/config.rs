//! Configuration types for loading scenes from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scene. A scene file is one of:
//!
//! - [`OrbitalSceneConfig`] – a star, its planets, moons and ring overlays
//! - [`FlightSceneConfig`]  – a keyframed flight path followed by the bird
//!
//! selected with the `scene` tag.
//!
//! # YAML format
//! An orbital scene:
//!
//! ```yaml
//! scene: orbital
//! timer:
//!   scale: 1.0
//! parameters:
//!   h0: 0.01                # step per frame before timer scaling
//!   units:                  # G is derived from these, or given as `G:`
//!     distance_m: 1.0e10
//!     mass_kg: 1.0e27
//!     time_s: 2.592e6
//!   g_multiplier: 1.0       # tuning factor applied on top of G
//!   min_separation: 1.0e-6
//! bodies:
//!   - name: sun
//!     kind: star
//!     radius: 0.069634
//!     m: 1989.0
//!     x: [0.0, 0.0, 0.0]
//!   - name: earth
//!     kind: planet
//!     radius: 0.00064
//!     m: 0.005972
//!     x: [14.71, 0.0, 0.0]
//!     v: [0.0, 7.8512, 0.0]
//!     semi_major_axis: 14.96
//!     rotation_rate: 6.28
//! ```
//!
//! A flight scene:
//!
//! ```yaml
//! scene: flight
//! tension: 0.1
//! timer:
//!   scale: 0.5
//! track:
//!   closed_loop:
//!     points:
//!       - { p: [0.0, 1.0, 0.0], t: 1.0 }
//!       - { p: [1.0, 1.0, 0.0], t: 2.0 }
//!       - { p: [1.0, -1.0, 0.0], t: 3.0 }
//!     end: 4.0
//! ```
//!
//! The scene layer maps this configuration into its runtime representation
//! and rejects anything malformed before the first frame.

use serde::Deserialize;

use crate::error::SceneError;
use crate::simulation::params::UnitSystem;
use crate::simulation::states::NVec3;

/// Top-level scene configuration loaded from YAML
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "scene", rename_all = "snake_case")]
pub enum SceneConfig {
    Orbital(OrbitalSceneConfig),
    Flight(FlightSceneConfig),
}

impl SceneConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

/// Playback speed for the scene timer
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct TimerConfig {
    #[serde(default = "one")]
    pub scale: f64, // multiplies elapsed real time (or the base step for orbital scenes)
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

// =========================================================================================
// orbital scenes
// =========================================================================================

#[derive(Deserialize, Debug, Clone)]
pub struct OrbitalSceneConfig {
    #[serde(default)]
    pub timer: TimerConfig,
    pub parameters: ParametersConfig,
    pub bodies: Vec<BodyConfig>, // initial state of every body, in scene units
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct UnitsConfig {
    pub distance_m: f64, // one scene distance unit in metres
    pub mass_kg: f64,    // one scene mass unit in kilograms
    pub time_s: f64,     // one scene time unit in seconds
}

impl From<UnitsConfig> for UnitSystem {
    fn from(u: UnitsConfig) -> Self {
        UnitSystem {
            distance_m: u.distance_m,
            mass_kg: u.mass_kg,
            time_s: u.time_s,
        }
    }
}

/// Global numerical and physical parameters for an orbital scene
#[derive(Deserialize, Debug, Clone)]
#[allow(non_snake_case)]
pub struct ParametersConfig {
    pub h0: f64,                    // step size per frame
    #[serde(default)]
    pub G: Option<f64>,             // gravitational constant in scene units
    #[serde(default)]
    pub units: Option<UnitsConfig>, // derive G from the unit system instead
    #[serde(default = "one")]
    pub g_multiplier: f64,          // tuning factor, not physics
    #[serde(default = "default_min_separation")]
    pub min_separation: f64,
}

impl ParametersConfig {
    /// Effective G: explicit value wins over the unit system, then the multiplier applies
    pub fn gravitational_constant(&self) -> Result<f64, SceneError> {
        let base = match (self.G, self.units) {
            (Some(g), _) => g,
            (None, Some(units)) => UnitSystem::from(units).gravitational_constant(),
            (None, None) => return Err(SceneError::MissingGravity),
        };
        Ok(base * self.g_multiplier)
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    Star,   // fixed attractor
    Planet, // orbits the stars
    Moon,   // orbits the stars and the body it is placed relative to
    Ring,   // copies the transform of the body it follows
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: String,
    pub kind: BodyKind,
    pub radius: f64,
    #[serde(default)]
    pub m: f64,
    #[serde(default = "zero3")]
    pub x: Vec<f64>, // initial position (relative to `relative_to` when set)
    #[serde(default = "zero3")]
    pub v: Vec<f64>, // initial velocity (relative to `relative_to` when set)
    #[serde(default)]
    pub inclination: f64, // axial tilt, radians
    #[serde(default)]
    pub semi_major_axis: Option<f64>,
    #[serde(default)]
    pub rotation_rate: f64, // spin, radians per time unit
    #[serde(default)]
    pub attractors: Vec<String>, // defaults to every star (plus `relative_to` for moons)
    #[serde(default)]
    pub relative_to: Option<String>,
    #[serde(default)]
    pub follows: Option<String>, // parent of a ring
    #[serde(default = "one")]
    pub display_scale: f64,
}

impl BodyConfig {
    pub fn position(&self) -> Result<NVec3, SceneError> {
        vec3_from("x", &self.x).map_err(|reason| SceneError::InvalidBody {
            name: self.name.clone(),
            reason,
        })
    }

    pub fn velocity(&self) -> Result<NVec3, SceneError> {
        vec3_from("v", &self.v).map_err(|reason| SceneError::InvalidBody {
            name: self.name.clone(),
            reason,
        })
    }
}

// =========================================================================================
// flight scenes
// =========================================================================================

#[derive(Deserialize, Debug, Clone)]
pub struct FlightSceneConfig {
    #[serde(default = "default_tension")]
    pub tension: f64, // cardinal spline K
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default = "default_trace_capacity")]
    pub trace_capacity: usize, // positions kept in the trajectory trace
    #[serde(default = "yes")]
    pub animate_bird: bool,
    pub track: TrackConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct KeyframeConfig {
    pub p: Vec<f64>, // position
    pub t: f64,      // time
}

impl KeyframeConfig {
    pub fn position(&self) -> Result<NVec3, SceneError> {
        vec3_from("p", &self.p).map_err(|reason| SceneError::InvalidParameter {
            name: "keyframes",
            reason: format!("keyframe at t = {}: {reason}", self.t),
        })
    }
}

/// Either an explicit padded keyframe list or a loop padded at build time.
/// Exactly one of the two must be set
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TrackConfig {
    #[serde(default)]
    pub keyframes: Option<Vec<KeyframeConfig>>,
    #[serde(default)]
    pub closed_loop: Option<LoopConfig>,
}

/// Loop points visited in order, returning to the first point at `end`
#[derive(Deserialize, Debug, Clone)]
pub struct LoopConfig {
    pub points: Vec<KeyframeConfig>,
    pub end: f64,
}

fn vec3_from(field: &str, c: &[f64]) -> Result<NVec3, String> {
    match c {
        [x, y, z] => Ok(NVec3::new(*x, *y, *z)),
        _ => Err(format!("`{field}` needs 3 components, got {}", c.len())),
    }
}

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

fn zero3() -> Vec<f64> {
    vec![0.0; 3]
}

fn default_min_separation() -> f64 {
    crate::simulation::params::DEFAULT_MIN_SEPARATION
}

fn default_tension() -> f64 {
    crate::animation::keyframes::DEFAULT_TENSION
}

fn default_trace_capacity() -> usize {
    crate::scene::trajectory::DEFAULT_TRACE_CAPACITY
}
