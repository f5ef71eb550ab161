pub mod error;
pub mod simulation;
pub mod animation;
pub mod configuration;
pub mod scene;

pub use error::SceneError;

pub use simulation::states::{Body, Motion, Spin, System, NVec3};
pub use simulation::params::{Parameters, UnitSystem};
pub use simulation::forces::{ForceLaw, ForceSet, InverseSquareGravity};
pub use simulation::integrator::{prime_forces, semi_implicit_euler};
pub use simulation::scenario::Scenario;

pub use animation::keyframes::{locate_segment, Keyframe, KeyframeTrack};
pub use animation::orientation::orientation_from_velocity;

pub use configuration::config::{SceneConfig, OrbitalSceneConfig, FlightSceneConfig, BodyConfig, ParametersConfig};

pub use scene::{setup, Frame, NodeTransform, Scene, FlightScene, OrbitalScene};
