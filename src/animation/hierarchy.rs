//! Articulated hierarchy (scene graph) and the flapping bird built on it.
//!
//! Each node stores a transform relative to its parent. The linear part is a
//! general 3x3 matrix rather than a rotation so a mirror (the left wing) can
//! be expressed directly. Nodes are stored parent-first, so a single forward
//! pass computes every global transform.

use std::f64::consts::PI;

use nalgebra::{Matrix3, Rotation3};

use crate::error::SceneError;
use crate::simulation::states::NVec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub translation: NVec3,
    pub linear: Matrix3<f64>,
}

impl Affine {
    pub fn identity() -> Self {
        Self {
            translation: NVec3::zeros(),
            linear: Matrix3::identity(),
        }
    }

    pub fn from_translation(translation: NVec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    pub fn new(translation: NVec3, linear: Matrix3<f64>) -> Self {
        Self { translation, linear }
    }

    /// `self` applied after `child`
    pub fn compose(&self, child: &Affine) -> Affine {
        Affine {
            translation: self.linear * child.translation + self.translation,
            linear: self.linear * child.linear,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<usize>,
    local: Affine,
    global: Affine,
}

#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    nodes: Vec<Node>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent` (or as a root). Parents must already exist
    pub fn add(&mut self, name: &str, parent: Option<&str>, local: Affine) -> Result<(), SceneError> {
        if self.index_of(name).is_some() {
            return Err(SceneError::InvalidParameter {
                name: "hierarchy",
                reason: format!("duplicate node `{name}`"),
            });
        }
        let parent = match parent {
            Some(p) => Some(self.index_of(p).ok_or_else(|| SceneError::UnknownNode(p.to_string()))?),
            None => None,
        };
        self.nodes.push(Node {
            name: name.to_string(),
            parent,
            local,
            global: local,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    fn node_mut(&mut self, name: &str) -> Result<&mut Node, SceneError> {
        self.nodes
            .iter_mut()
            .find(|n| n.name == name)
            .ok_or_else(|| SceneError::UnknownNode(name.to_string()))
    }

    pub fn set_linear(&mut self, name: &str, linear: Matrix3<f64>) -> Result<(), SceneError> {
        self.node_mut(name)?.local.linear = linear;
        Ok(())
    }

    pub fn set_translation(&mut self, name: &str, translation: NVec3) -> Result<(), SceneError> {
        self.node_mut(name)?.local.translation = translation;
        Ok(())
    }

    pub fn local(&self, name: &str) -> Option<Affine> {
        self.index_of(name).map(|i| self.nodes[i].local)
    }

    pub fn global(&self, name: &str) -> Option<Affine> {
        self.index_of(name).map(|i| self.nodes[i].global)
    }

    /// Recompute every global transform, parents before children
    pub fn update_local_to_global(&mut self) {
        for i in 0..self.nodes.len() {
            let global = match self.nodes[i].parent {
                Some(p) => self.nodes[p].global.compose(&self.nodes[i].local),
                None => self.nodes[i].local,
            };
            self.nodes[i].global = global;
        }
    }

    /// `(name, global)` for every node, in insertion order
    pub fn globals(&self) -> impl Iterator<Item = (&str, &Affine)> {
        self.nodes.iter().map(|n| (n.name.as_str(), &n.global))
    }
}

// =========================================================================================
// bird
// =========================================================================================

const HEAD_RADIUS: f64 = 0.25;
const WING_LENGTH: f64 = 0.6;

/// Root node of the bird, driven by the flight path
pub const BIRD_ROOT: &str = "body";

/// Mirror across the x = 0 plane
pub fn x_symmetry() -> Matrix3<f64> {
    Matrix3::from_diagonal(&NVec3::new(-1.0, 1.0, 1.0))
}

fn rot_x(angle: f64) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&NVec3::x_axis(), angle).into_inner()
}

fn rot_z(angle: f64) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&NVec3::z_axis(), angle).into_inner()
}

/// Body, head with eyes and beak, and two-part wings on each side
pub fn bird() -> Result<Hierarchy, SceneError> {
    let mut h = Hierarchy::new();
    let r = HEAD_RADIUS;

    h.add(BIRD_ROOT, None, Affine::identity())?;
    h.add("head", Some(BIRD_ROOT), Affine::from_translation(NVec3::new(0.0, 0.25, 0.6)))?;

    let eye = r * NVec3::new(1.0 / 3.0, 1.0 / 2.0, 1.0 / 1.5);
    h.add("eye_left", Some("head"), Affine::from_translation(eye))?;
    h.add("eye_right", Some("head"), Affine::from_translation(NVec3::new(-eye.x, eye.y, eye.z)))?;

    // beak tilted down by a tenth of a half turn
    let beak_angle = PI / 10.0;
    let beak = NVec3::new(0.0, -beak_angle.sin() * r * 0.8, beak_angle.cos() * r * 0.8);
    h.add("mouth", Some("head"), Affine::new(beak, rot_x(beak_angle)))?;

    let hand_offset = Affine::from_translation(NVec3::new(-WING_LENGTH * 0.75, 0.0, 0.0));
    h.add("wing_arm_right", Some(BIRD_ROOT), Affine::from_translation(NVec3::new(-0.2, 0.0, 0.0)))?;
    h.add("wing_hand_right", Some("wing_arm_right"), hand_offset)?;
    h.add("wing_arm_left", Some(BIRD_ROOT), Affine::new(NVec3::new(0.2, 0.0, 0.0), x_symmetry()))?;
    h.add("wing_hand_left", Some("wing_arm_left"), hand_offset)?;

    h.update_local_to_global();
    Ok(h)
}

/// Pose the bird's head and wings for time `t`, then refresh globals
pub fn animate_bird(h: &mut Hierarchy, t: f64) -> Result<(), SceneError> {
    h.set_linear("head", rot_x((2.0 * PI * t).sin() / 3.0))?;

    let flap = rot_z(0.75 * (4.0 * PI * (t - 0.4)).sin());
    h.set_linear("wing_arm_right", flap)?;
    h.set_linear("wing_hand_right", flap)?;
    // the left arm carries the mirror, its hand inherits it
    h.set_linear("wing_arm_left", x_symmetry() * flap)?;
    h.set_linear("wing_hand_left", flap)?;

    h.update_local_to_global();
    Ok(())
}
