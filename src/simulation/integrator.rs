//! Fixed-step time integrator for the orbital system
//!
//! Semi-implicit Euler driven by a `ForceSet`: kick with the force stored on
//! each body, drift with the new velocity, then refresh the forces from the
//! new positions. Not energy conserving; orbits drift slowly for large steps.

use log::trace;

use super::forces::ForceSet;
use super::states::{NVec3, System};
use crate::error::SceneError;

/// Compute the forces every orbiting body feels at its current position and
/// store them on the bodies. Called once at setup so the first step has a force
pub fn prime_forces(sys: &mut System, forces: &ForceSet) -> Result<(), SceneError> {
    refresh_forces(sys, forces)
}

/// Advance the system by one step of size `dt`.
///
/// Every body uses the same `dt`. The kick reads the force stored at the end
/// of the previous step, so it only depends on positions from before anything
/// moved in this step. Forces are refreshed once every body has drifted, which
/// keeps all of them at one time level whatever the body order.
/// The step is taken on a copy and committed only when it succeeds; on error
/// `sys` is left exactly as it was. Followers are not touched here
pub fn semi_implicit_euler(sys: &mut System, forces: &ForceSet, dt: f64) -> Result<(), SceneError> {
    if sys.bodies.is_empty() {
        return Ok(());
    }

    let mut next = sys.clone();
    for b in next.bodies.iter_mut() {
        // Spin accumulates for every body, fixed or not
        b.spin.angle += b.spin.rate * dt;
        b.rotation = b.spin.rotation().into_inner();

        if !b.is_orbiting() {
            continue;
        }

        // Kick: v_n+1 = v_n + dt * F_n / m
        b.v += dt * b.force / b.m;

        // Drift: x_n+1 = x_n + dt * v_n+1
        b.x += dt * b.v;
    }

    next.t += dt;

    // F_n+1 from x_n+1, used by the next kick
    refresh_forces(&mut next, forces)?;
    *sys = next;

    trace!("stepped {} bodies to t = {:.5}", sys.bodies.len(), sys.t);
    Ok(())
}

fn refresh_forces(sys: &mut System, forces: &ForceSet) -> Result<(), SceneError> {
    let mut f_new = vec![NVec3::zeros(); sys.bodies.len()];
    forces.accumulate_forces(sys, &mut f_new)?;

    for (b, f) in sys.bodies.iter_mut().zip(f_new) {
        if b.is_orbiting() {
            b.force = f;
            b.ensure_finite()?;
        }
    }
    Ok(())
}
