//! Solar-system scene: the orbital integrator driven once per frame
//!
//! Every frame advances all bodies by the same step `h0 * timer.scale`, copies
//! ring overlays onto their parents and reports one transform per body. A
//! numerical fault halts the scene; later frames return the same error.

use log::{debug, info, warn};

use super::timer::IntervalTimer;
use super::{Frame, NodeTransform, Scene};
use crate::configuration::config::OrbitalSceneConfig;
use crate::error::SceneError;
use crate::simulation::diagnostics::RevolutionCounter;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::Motion;

struct Revolutions {
    body: usize,
    attractor: usize,
    counter: RevolutionCounter,
}

pub struct OrbitalScene {
    scenario: Scenario,
    timer: IntervalTimer,
    revolutions: Vec<Revolutions>,
    halted: Option<SceneError>,
}

impl OrbitalScene {
    pub fn setup(scenario: Scenario, timer_scale: f64) -> Result<Self, SceneError> {
        let timer = IntervalTimer::free_running(timer_scale)?;
        let bodies = &scenario.system.bodies;

        // Count turns around the nearest attractor (a moon around its planet)
        let revolutions = bodies
            .iter()
            .enumerate()
            .filter_map(|(i, b)| match &b.motion {
                Motion::Orbit { attractors } => attractors
                    .iter()
                    .copied()
                    .min_by(|&a, &c| {
                        let da = (b.x - bodies[a].x).norm();
                        let dc = (b.x - bodies[c].x).norm();
                        da.total_cmp(&dc)
                    })
                    .map(|a| Revolutions {
                        body: i,
                        attractor: a,
                        counter: RevolutionCounter::new(b.x - bodies[a].x),
                    }),
                _ => None,
            })
            .collect();

        Ok(Self {
            scenario,
            timer,
            revolutions,
            halted: None,
        })
    }

    pub fn from_config(cfg: &OrbitalSceneConfig) -> Result<Self, SceneError> {
        let scenario = Scenario::build_scenario(cfg)?;
        Self::setup(scenario, cfg.timer.scale)
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Simulation step used for every body this frame
    pub fn step_size(&self) -> f64 {
        self.scenario.parameters.h0 * self.timer.scale
    }

    /// Completed revolutions of `name` around its nearest attractor
    pub fn revolutions(&self, name: &str) -> Option<u32> {
        let i = self.scenario.system.index_of(name)?;
        self.revolutions
            .iter()
            .find(|r| r.body == i)
            .map(|r| r.counter.completed())
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    fn track_revolutions(&mut self) {
        let bodies = &self.scenario.system.bodies;
        for r in self.revolutions.iter_mut() {
            let rel = bodies[r.body].x - bodies[r.attractor].x;
            if r.counter.update(rel) {
                info!(
                    "{} completed revolution {} around {} at t = {:.3}",
                    bodies[r.body].name,
                    r.counter.completed(),
                    bodies[r.attractor].name,
                    self.scenario.system.t
                );
            }
        }
    }

    fn transforms(&self) -> Vec<NodeTransform> {
        self.scenario
            .system
            .bodies
            .iter()
            .map(|b| NodeTransform {
                name: b.name.clone(),
                translation: b.x,
                linear: b.rotation,
                scale: b.radius * b.display_scale,
            })
            .collect()
    }
}

impl Scene for OrbitalScene {
    fn name(&self) -> &'static str {
        "orbital"
    }

    fn advance_and_get_transforms(&mut self, elapsed: f64) -> Result<Frame, SceneError> {
        if let Some(err) = &self.halted {
            return Err(err.clone());
        }

        self.timer.update(elapsed)?;
        let dt = self.step_size();

        if let Err(err) = self.scenario.step(dt) {
            warn!("orbital scene halted at t = {:.5}: {err}", self.scenario.system.t);
            self.halted = Some(err.clone());
            return Err(err);
        }
        self.track_revolutions();
        debug!("orbital frame: t = {:.5}, dt = {dt}", self.scenario.system.t);

        Ok(Frame {
            time: self.scenario.system.t,
            transforms: self.transforms(),
        })
    }
}
