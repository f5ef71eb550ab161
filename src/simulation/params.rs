//! Numerical and physical parameters for the orbital simulation
//!
//! `Parameters` holds runtime settings:
//! - base integration step `h0` (scaled by the timer every frame),
//! - the gravitational constant `G` already expressed in scene units,
//! - the minimum separation below which the inverse-square law is refused
//!
//! `UnitSystem` converts the SI gravitational constant into scene units.

use crate::error::SceneError;

/// SI gravitational constant, m^3 kg^-1 s^-2
pub const G_SI: f64 = 6.674e-11;

/// Default minimum attractor distance
pub const DEFAULT_MIN_SEPARATION: f64 = 1.0e-9;

#[derive(Debug, Clone)]
#[allow(non_snake_case)]
pub struct Parameters {
    pub h0: f64,             // base step size per frame
    pub G: f64,              // gravitational constant (scene units)
    pub min_separation: f64, // closest allowed body/attractor distance
}

impl Parameters {
    #[allow(non_snake_case)]
    pub fn new(h0: f64, G: f64) -> Self {
        Self {
            h0,
            G,
            min_separation: DEFAULT_MIN_SEPARATION,
        }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if !(self.h0 > 0.0 && self.h0.is_finite()) {
            return Err(SceneError::InvalidParameter {
                name: "h0",
                reason: format!("step must be positive and finite, got {}", self.h0),
            });
        }
        if !(self.G > 0.0 && self.G.is_finite()) {
            return Err(SceneError::InvalidParameter {
                name: "G",
                reason: format!("must be positive and finite, got {}", self.G),
            });
        }
        if !(self.min_separation >= 0.0) {
            return Err(SceneError::InvalidParameter {
                name: "min_separation",
                reason: format!("must be non-negative, got {}", self.min_separation),
            });
        }
        Ok(())
    }
}

/// Size of one scene unit of distance, mass and time, in SI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSystem {
    pub distance_m: f64,
    pub mass_kg: f64,
    pub time_s: f64,
}

impl UnitSystem {
    /// `G` in scene units: G_SI * M * T^2 / L^3
    pub fn gravitational_constant(&self) -> f64 {
        G_SI * self.mass_kg * self.time_s * self.time_s / self.distance_m.powi(3)
    }
}
