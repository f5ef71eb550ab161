//! Core state types for the orbital simulation.
//!
//! Defines the body/system structs:
//! - `Body`   one flat record for stars, planets, moons and ring overlays
//! - `Motion` how the integrator treats a body (fixed, orbiting, following)
//! - `Spin`   axial tilt + accumulated spin angle used for display rotation
//! - `System` the owned body list plus the current simulation time `t`

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::error::SceneError;

pub type NVec3 = Vector3<f64>;

/// How a body moves from frame to frame
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    /// Never integrated (the central star)
    Fixed,
    /// Integrated under the pull of every listed attractor (indices into `System::bodies`)
    Orbit { attractors: Vec<usize> },
    /// Copies translation and rotation of `parent` after the integration pass
    Follow { parent: usize },
}

/// Axial tilt and spin state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spin {
    pub inclination: f64, // fixed tilt about +Y (radians)
    pub rate: f64,        // spin rate about the polar axis (radians per time unit)
    pub angle: f64,       // accumulated spin angle
}

impl Spin {
    pub fn new(inclination: f64, rate: f64) -> Self {
        Self {
            inclination,
            rate,
            angle: 0.0,
        }
    }

    /// `R_inclination * R_spin`: tilt about +Y applied after spinning about +Z
    pub fn rotation(&self) -> Rotation3<f64> {
        let tilt = Rotation3::from_axis_angle(&NVec3::y_axis(), self.inclination);
        let spin = Rotation3::from_axis_angle(&NVec3::z_axis(), self.angle);
        tilt * spin
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub x: NVec3,     // position
    pub v: NVec3,     // velocity
    pub force: NVec3, // force applied during the next step
    pub m: f64,       // mass
    pub radius: f64,  // physical radius (scene units)
    pub semi_major_axis: Option<f64>,
    pub spin: Spin,
    pub motion: Motion,
    pub display_scale: f64, // radius multiplier handed to the renderer
    pub rotation: Matrix3<f64>, // display rotation, refreshed every frame
}

impl Body {
    /// A star sitting still at `x`
    pub fn star(name: impl Into<String>, radius: f64, m: f64, x: NVec3) -> Self {
        Self {
            name: name.into(),
            x,
            v: NVec3::zeros(),
            force: NVec3::zeros(),
            m,
            radius,
            semi_major_axis: None,
            spin: Spin::default(),
            motion: Motion::Fixed,
            display_scale: 1.0,
            rotation: Matrix3::identity(),
        }
    }

    /// A body orbiting the given attractors, starting at `x` with velocity `v`
    pub fn planet(
        name: impl Into<String>,
        radius: f64,
        m: f64,
        x: NVec3,
        v: NVec3,
        attractors: Vec<usize>,
    ) -> Self {
        Self {
            v,
            motion: Motion::Orbit { attractors },
            ..Self::star(name, radius, m, x)
        }
    }

    /// An overlay that rides along with `parent` (e.g. a planetary ring)
    pub fn follower(name: impl Into<String>, radius: f64, parent: usize) -> Self {
        Self {
            motion: Motion::Follow { parent },
            ..Self::star(name, radius, 0.0, NVec3::zeros())
        }
    }

    pub fn with_spin(mut self, spin: Spin) -> Self {
        self.spin = spin;
        self.rotation = spin.rotation().into_inner();
        self
    }

    pub fn with_semi_major_axis(mut self, a: f64) -> Self {
        self.semi_major_axis = Some(a);
        self
    }

    pub fn with_display_scale(mut self, scale: f64) -> Self {
        self.display_scale = scale;
        self
    }

    pub fn is_orbiting(&self) -> bool {
        matches!(self.motion, Motion::Orbit { .. })
    }

    pub fn speed(&self) -> f64 {
        self.v.norm()
    }

    pub(crate) fn ensure_finite(&self) -> Result<(), SceneError> {
        let finite = self.x.iter().chain(self.v.iter()).chain(self.force.iter()).all(|c| c.is_finite());
        if finite {
            Ok(())
        } else {
            Err(SceneError::NonFiniteState(self.name.clone()))
        }
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // every body of the scene, attractors referenced by index
    pub t: f64,            // simulation time
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == name)
    }

    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// Copy translation and rotation of each follower's parent.
    /// Runs after the integration pass so followers see this frame's parents
    pub fn apply_followers(&mut self) {
        for i in 0..self.bodies.len() {
            if let Motion::Follow { parent } = self.bodies[i].motion {
                let (x, rotation) = (self.bodies[parent].x, self.bodies[parent].rotation);
                let follower = &mut self.bodies[i];
                follower.x = x;
                follower.rotation = rotation;
            }
        }
    }
}
