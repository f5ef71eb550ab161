//! Orbit diagnostics used to watch integrator drift
//!
//! - `RevolutionCounter` unwraps the angle of a body around an attractor and
//!   counts completed revolutions
//! - `OrbitSample` captures distance, speed and specific orbital energy

use std::f64::consts::{PI, TAU};

use super::states::{Body, NVec3};

/// Tracks the unwrapped orbital angle of a body in the xy plane of its attractor
#[derive(Debug, Clone)]
pub struct RevolutionCounter {
    last_angle: f64,
    unwrapped: f64,
    completed: u32,
}

impl RevolutionCounter {
    pub fn new(relative_x: NVec3) -> Self {
        Self {
            last_angle: relative_x.y.atan2(relative_x.x),
            unwrapped: 0.0,
            completed: 0,
        }
    }

    /// Feed the new position relative to the attractor.
    /// Returns true when this update completed a full revolution
    pub fn update(&mut self, relative_x: NVec3) -> bool {
        let angle = relative_x.y.atan2(relative_x.x);
        let mut delta = angle - self.last_angle;

        // atan2 jumps by 2pi across the negative x axis
        if delta > PI {
            delta -= TAU;
        } else if delta < -PI {
            delta += TAU;
        }

        self.last_angle = angle;
        self.unwrapped += delta;

        let turns = (self.unwrapped.abs() / TAU).floor() as u32;
        if turns > self.completed {
            self.completed = turns;
            true
        } else {
            false
        }
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn swept_angle(&self) -> f64 {
        self.unwrapped
    }
}

/// Snapshot of a body's orbit around one attractor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSample {
    pub distance: f64,
    pub speed: f64,
    pub specific_energy: f64, // v^2/2 - G M / r
}

#[allow(non_snake_case)]
pub fn sample_orbit(body: &Body, attractor: &Body, G: f64) -> OrbitSample {
    let r = body.x - attractor.x;
    let rel_v = body.v - attractor.v;
    let distance = r.norm();
    let speed = rel_v.norm();

    OrbitSample {
        distance,
        speed,
        specific_energy: 0.5 * speed * speed - G * attractor.m / distance,
    }
}
