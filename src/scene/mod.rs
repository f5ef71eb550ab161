//! Frame driver
//!
//! A scene is set up once from its configuration and then asked, once per
//! displayed frame, to advance and hand back the transforms the (external)
//! renderer should draw with.

pub mod timer;
pub mod trajectory;
pub mod flight;
pub mod orbital;

use nalgebra::Matrix3;

use crate::configuration::config::SceneConfig;
use crate::error::SceneError;
use crate::simulation::states::NVec3;

pub use flight::FlightScene;
pub use orbital::OrbitalScene;

/// World transform of one drawable element
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTransform {
    pub name: String,
    pub translation: NVec3,
    pub linear: Matrix3<f64>, // rotation, possibly with a mirror
    pub scale: f64,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub time: f64,
    pub transforms: Vec<NodeTransform>,
}

impl Frame {
    pub fn get(&self, name: &str) -> Option<&NodeTransform> {
        self.transforms.iter().find(|n| n.name == name)
    }
}

pub trait Scene {
    fn name(&self) -> &'static str;

    /// Advance by `elapsed` seconds of real time and return this frame's transforms
    fn advance_and_get_transforms(&mut self, elapsed: f64) -> Result<Frame, SceneError>;
}

/// Build the scene a configuration describes.
/// A malformed configuration refuses to start
pub fn setup(cfg: &SceneConfig) -> Result<Box<dyn Scene>, SceneError> {
    let scene: Box<dyn Scene> = match cfg {
        SceneConfig::Orbital(c) => Box::new(OrbitalScene::from_config(c)?),
        SceneConfig::Flight(c) => Box::new(FlightScene::from_config(c)?),
    };
    Ok(scene)
}
