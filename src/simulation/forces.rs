//! Force contributors for the orbital integrator
//!
//! Defines the force-law trait, the set that sums every registered law, and
//! the inverse-square attraction toward each body's listed attractors

use log::warn;

use crate::error::SceneError;
use crate::simulation::states::{Motion, NVec3, System};

/// Collection of force terms.
/// Each term implements [`ForceLaw`] and their contributions are summed
/// into a single force vector per body
pub struct ForceSet {
    terms: Vec<Box<dyn ForceLaw + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a force term
    pub fn with(mut self, term: impl ForceLaw + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compute total forces for all bodies in `sys`
    /// - `out[i]` is set to the sum of contributions from all terms
    pub fn accumulate_forces(&self, sys: &System, out: &mut [NVec3]) -> Result<(), SceneError> {
        // Zero buffer
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }
        for term in &self.terms {
            term.force(sys, out)?;
        }
        Ok(())
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Force sources operating on a [`System`].
/// Implementations add their contribution into `out[i]` for each body
pub trait ForceLaw {
    fn force(&self, sys: &System, out: &mut [NVec3]) -> Result<(), SceneError>;
}

/// Newtonian attraction of each orbiting body toward each of its attractors.
/// Attractors are not pulled back: the star stays put and a planet does not
/// feel its moon
#[allow(non_snake_case)]
pub struct InverseSquareGravity {
    pub G: f64,
    pub min_separation: f64,
}

impl ForceLaw for InverseSquareGravity {
    fn force(&self, sys: &System, out: &mut [NVec3]) -> Result<(), SceneError> {
        for (i, body) in sys.bodies.iter().enumerate() {
            let Motion::Orbit { attractors } = &body.motion else {
                continue;
            };

            for &j in attractors {
                let attractor = &sys.bodies[j];

                // r points from the attractor to the body; the pull is along -r
                let r = body.x - attractor.x;
                let dist = r.norm();

                if !(dist > self.min_separation) {
                    warn!(
                        "{} is {:e} away from {}, refusing inverse-square force",
                        body.name, dist, attractor.name
                    );
                    return Err(SceneError::ZeroDistance {
                        body: body.name.clone(),
                        attractor: attractor.name.clone(),
                        min_separation: self.min_separation,
                    });
                }

                // |F| = G M m / r^2, direction -r/|r|
                let magnitude = self.G * attractor.m * body.m / (dist * dist);
                out[i] -= magnitude * (r / dist);
            }
        }
        Ok(())
    }
}
