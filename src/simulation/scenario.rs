//! Build fully-initialized orbital scenarios from configuration
//!
//! Takes an `OrbitalSceneConfig` (YAML-facing descriptor table) and produces
//! the runtime bundle containing:
//! - numerical parameters (`Parameters`)
//! - system state (`System` with bodies at t = 0 and primed forces)
//! - active force set (`ForceSet`)
//!
//! Malformed tables are rejected here, before the first frame.

use std::collections::HashMap;

use log::{debug, info};

use crate::configuration::config::{BodyConfig, BodyKind, OrbitalSceneConfig};
use crate::error::SceneError;
use crate::simulation::forces::{ForceSet, InverseSquareGravity};
use crate::simulation::integrator::{prime_forces, semi_implicit_euler};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, Motion, Spin, System};

/// Fully-initialized orbital scenario: parameters, state and force laws
pub struct Scenario {
    pub parameters: Parameters,
    pub system: System,
    pub forces: ForceSet,
}

impl Scenario {
    /// Assemble a scenario from already-built bodies.
    /// Forces are primed from the starting positions and followers snapped
    /// onto their parents
    pub fn new(parameters: Parameters, bodies: Vec<Body>) -> Result<Self, SceneError> {
        parameters.validate()?;
        check_links(&bodies)?;
        let forces = ForceSet::new().with(InverseSquareGravity {
            G: parameters.G,
            min_separation: parameters.min_separation,
        });

        let mut system = System::new(bodies);
        prime_forces(&mut system, &forces)?;
        system.apply_followers();

        Ok(Self {
            parameters,
            system,
            forces,
        })
    }

    pub fn build_scenario(cfg: &OrbitalSceneConfig) -> Result<Self, SceneError> {
        let p_cfg = &cfg.parameters;
        let parameters = Parameters {
            h0: p_cfg.h0,
            G: p_cfg.gravitational_constant()?,
            min_separation: p_cfg.min_separation,
        };

        let bodies = resolve_bodies(&cfg.bodies)?;
        info!(
            "orbital scenario: {} bodies, G = {:.6}, h0 = {}",
            bodies.len(),
            parameters.G,
            parameters.h0
        );

        Self::new(parameters, bodies)
    }

    /// One integration step of size `dt`, followers copied afterwards
    pub fn step(&mut self, dt: f64) -> Result<(), SceneError> {
        semi_implicit_euler(&mut self.system, &self.forces, dt)?;
        self.system.apply_followers();
        Ok(())
    }
}

/// Map descriptor records to runtime bodies, resolving names to indices
fn resolve_bodies(cfgs: &[BodyConfig]) -> Result<Vec<Body>, SceneError> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, bc) in cfgs.iter().enumerate() {
        if index.insert(bc.name.as_str(), i).is_some() {
            return Err(invalid(&bc.name, "duplicate body name"));
        }
    }
    let lookup = |name: &str| index.get(name).copied().ok_or_else(|| SceneError::UnknownBody(name.to_string()));

    let stars: Vec<usize> = cfgs
        .iter()
        .enumerate()
        .filter(|(_, bc)| bc.kind == BodyKind::Star)
        .map(|(i, _)| i)
        .collect();

    let mut bodies: Vec<Body> = Vec::with_capacity(cfgs.len());
    for (i, bc) in cfgs.iter().enumerate() {
        check_scalars(bc)?;
        let (mut x, mut v) = (bc.position()?, bc.velocity()?);

        // Offsets from a parent placed earlier in the table
        if let Some(parent_name) = &bc.relative_to {
            let parent = lookup(parent_name)?;
            if parent >= i {
                return Err(invalid(&bc.name, "`relative_to` must name a body listed before it"));
            }
            x += bodies[parent].x;
            v += bodies[parent].v;
        }

        let body = match bc.kind {
            BodyKind::Star => {
                require_mass(bc)?;
                Body::star(bc.name.as_str(), bc.radius, bc.m, x)
            }
            BodyKind::Planet | BodyKind::Moon => {
                require_mass(bc)?;
                let attractors = attractors_for(bc, i, &stars, &lookup)?;
                for &a in &attractors {
                    if cfgs[a].kind == BodyKind::Ring {
                        return Err(invalid(&bc.name, "a ring cannot attract"));
                    }
                }
                Body::planet(bc.name.as_str(), bc.radius, bc.m, x, v, attractors)
            }
            BodyKind::Ring => {
                let parent_name = bc
                    .follows
                    .as_deref()
                    .ok_or_else(|| invalid(&bc.name, "a ring needs `follows`"))?;
                let parent = lookup(parent_name)?;
                if cfgs[parent].kind == BodyKind::Ring {
                    return Err(invalid(&bc.name, "a ring cannot follow another ring"));
                }
                Body::follower(bc.name.as_str(), bc.radius, parent)
            }
        };

        let mut body = body
            .with_spin(Spin::new(bc.inclination, bc.rotation_rate))
            .with_display_scale(bc.display_scale);
        if let Some(a) = bc.semi_major_axis {
            body = body.with_semi_major_axis(a);
        }
        debug!("body {} ({:?}) at {:?}", body.name, bc.kind, body.x.as_slice());
        bodies.push(body);
    }

    Ok(bodies)
}

fn attractors_for(
    bc: &BodyConfig,
    i: usize,
    stars: &[usize],
    lookup: &impl Fn(&str) -> Result<usize, SceneError>,
) -> Result<Vec<usize>, SceneError> {
    let mut attractors = if bc.attractors.is_empty() {
        let mut defaults = stars.to_vec();
        if bc.kind == BodyKind::Moon {
            if let Some(parent) = &bc.relative_to {
                defaults.push(lookup(parent)?);
            }
        }
        defaults
    } else {
        bc.attractors.iter().map(|name| lookup(name)).collect::<Result<Vec<_>, _>>()?
    };
    attractors.sort_unstable();
    attractors.dedup();

    if attractors.is_empty() {
        return Err(invalid(&bc.name, "nothing attracts this body"));
    }
    if attractors.contains(&i) {
        return Err(invalid(&bc.name, "a body cannot attract itself"));
    }
    Ok(attractors)
}

/// Index, mass and size checks for bodies built in code rather than from a table
fn check_links(bodies: &[Body]) -> Result<(), SceneError> {
    let n = bodies.len();
    for (i, b) in bodies.iter().enumerate() {
        check_sizes(&b.name, b.radius, b.display_scale)?;
        match &b.motion {
            Motion::Fixed => {}
            Motion::Orbit { attractors } => {
                if !(b.m > 0.0) {
                    return Err(invalid(&b.name, "an orbiting body needs a positive mass"));
                }
                if attractors.is_empty() {
                    return Err(invalid(&b.name, "nothing attracts this body"));
                }
                if attractors.iter().any(|&a| a >= n || a == i) {
                    return Err(invalid(&b.name, "attractor index out of range or self"));
                }
            }
            Motion::Follow { parent } => {
                if *parent >= n || *parent == i {
                    return Err(invalid(&b.name, "followed body index out of range or self"));
                }
            }
        }
    }
    Ok(())
}

fn require_mass(bc: &BodyConfig) -> Result<(), SceneError> {
    if bc.m > 0.0 {
        Ok(())
    } else {
        Err(invalid(&bc.name, &format!("mass must be positive, got {}", bc.m)))
    }
}

fn check_scalars(bc: &BodyConfig) -> Result<(), SceneError> {
    let scalars = [bc.radius, bc.m, bc.inclination, bc.rotation_rate, bc.display_scale];
    let all_finite = scalars
        .iter()
        .chain(bc.x.iter())
        .chain(bc.v.iter())
        .all(|c| c.is_finite());
    if !all_finite {
        return Err(invalid(&bc.name, "non-finite value"));
    }
    check_sizes(&bc.name, bc.radius, bc.display_scale)
}

fn check_sizes(name: &str, radius: f64, display_scale: f64) -> Result<(), SceneError> {
    if !(radius > 0.0) {
        return Err(invalid(name, &format!("radius must be positive, got {radius}")));
    }
    if !(display_scale > 0.0) {
        return Err(invalid(name, &format!("display_scale must be positive, got {display_scale}")));
    }
    Ok(())
}

fn invalid(name: &str, reason: &str) -> SceneError {
    SceneError::InvalidBody {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
