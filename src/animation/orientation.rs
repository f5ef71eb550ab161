//! Orientation of a moving body from its velocity
//!
//! The body's canonical forward axis `+Z` is rotated onto the direction of
//! travel. The shortest-arc rotation can leave the body's up axis `+Y`
//! pointing below the horizon; in that case the body is rolled by π about its
//! new forward axis so it stays upright.

use std::f64::consts::PI;

use nalgebra::{Rotation3, Unit};

use crate::simulation::states::NVec3;

/// Speeds below this keep the previous heading
pub const MIN_HEADING_SPEED: f64 = 1.0e-12;

pub fn forward_axis() -> NVec3 {
    NVec3::z()
}

pub fn world_up() -> NVec3 {
    NVec3::z()
}

/// Rotation taking `+Z` onto `velocity`, rolled upright when needed.
/// Returns `None` for a (near) zero velocity
pub fn orientation_from_velocity(velocity: &NVec3) -> Option<Rotation3<f64>> {
    if velocity.norm() < MIN_HEADING_SPEED {
        return None;
    }
    let direction = velocity.normalize();
    let forward = forward_axis();

    // rotation_between has no answer for exactly opposite vectors
    let heading = Rotation3::rotation_between(&forward, &direction)
        .unwrap_or_else(|| Rotation3::from_axis_angle(&NVec3::x_axis(), PI));

    let up = heading * NVec3::y();
    if up.dot(&world_up()) < 0.0 {
        let roll_axis = Unit::new_normalize(heading * forward);
        Some(Rotation3::from_axis_angle(&roll_axis, PI) * heading)
    } else {
        Some(heading)
    }
}
