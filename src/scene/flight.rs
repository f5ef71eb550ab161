//! Bird flying along a keyframed cardinal spline
//!
//! Per frame: advance the looping timer (clearing the trace when it wraps),
//! interpolate position and velocity, orient the bird along its velocity and
//! flap its wings.

use log::{debug, info};
use nalgebra::Rotation3;

use super::timer::IntervalTimer;
use super::trajectory::{Trajectory, MAX_TRACE_CAPACITY};
use super::{Frame, NodeTransform, Scene};
use crate::animation::hierarchy::{animate_bird, bird, Hierarchy, BIRD_ROOT};
use crate::animation::keyframes::{Keyframe, KeyframeTrack};
use crate::animation::orientation::orientation_from_velocity;
use crate::configuration::config::{FlightSceneConfig, KeyframeConfig};
use crate::error::SceneError;
use crate::simulation::states::NVec3;

pub struct FlightScene {
    track: KeyframeTrack,
    timer: IntervalTimer,
    trace: Trajectory,
    bird: Option<Hierarchy>,
    heading: Rotation3<f64>, // kept when the velocity vanishes
    position: NVec3,
    velocity: NVec3,
}

impl FlightScene {
    /// The timer loops over the track's interpolable range
    pub fn setup(
        track: KeyframeTrack,
        timer_scale: f64,
        trace_capacity: usize,
        animate: bool,
    ) -> Result<Self, SceneError> {
        if trace_capacity > MAX_TRACE_CAPACITY {
            return Err(SceneError::InvalidParameter {
                name: "trace_capacity",
                reason: format!("at most {MAX_TRACE_CAPACITY} points, got {trace_capacity}"),
            });
        }
        let (t_min, t_max) = track.interior_range();
        let timer = IntervalTimer::new(t_min, t_max, timer_scale)?;
        let bird = if animate { Some(bird()?) } else { None };

        info!(
            "flight scene: {} keyframes, t in [{t_min}, {t_max}), K = {}",
            track.keyframes().len(),
            track.tension()
        );

        Ok(Self {
            track,
            timer,
            trace: Trajectory::new(trace_capacity),
            bird,
            heading: Rotation3::identity(),
            position: NVec3::zeros(),
            velocity: NVec3::zeros(),
        })
    }

    pub fn from_config(cfg: &FlightSceneConfig) -> Result<Self, SceneError> {
        let track = match (&cfg.track.keyframes, &cfg.track.closed_loop) {
            (Some(keyframes), None) => KeyframeTrack::new(to_keyframes(keyframes)?, cfg.tension)?,
            (None, Some(lp)) => KeyframeTrack::closed_loop(&to_keyframes(&lp.points)?, lp.end, cfg.tension)?,
            _ => {
                return Err(SceneError::InvalidParameter {
                    name: "track",
                    reason: "set exactly one of `keyframes` or `closed_loop`".to_string(),
                })
            }
        };
        Self::setup(track, cfg.timer.scale, cfg.trace_capacity, cfg.animate_bird)
    }

    pub fn track(&self) -> &KeyframeTrack {
        &self.track
    }

    pub fn timer(&self) -> &IntervalTimer {
        &self.timer
    }

    pub fn trace(&self) -> &Trajectory {
        &self.trace
    }

    pub fn position(&self) -> NVec3 {
        self.position
    }

    pub fn velocity(&self) -> NVec3 {
        self.velocity
    }

    pub fn heading(&self) -> &Rotation3<f64> {
        &self.heading
    }
}

impl Scene for FlightScene {
    fn name(&self) -> &'static str {
        "flight"
    }

    fn advance_and_get_transforms(&mut self, elapsed: f64) -> Result<Frame, SceneError> {
        if self.timer.update(elapsed)? {
            info!("timer wrapped to {}, clearing trace", self.timer.t_min);
            self.trace.clear();
        }
        let t = self.timer.t;

        self.position = self.track.interpolate_position(t)?;
        self.velocity = self.track.interpolate_velocity(t)?;
        self.trace.push(self.position);

        if let Some(r) = orientation_from_velocity(&self.velocity) {
            self.heading = r;
        }
        debug!("flight frame: t = {t:.4}, p = {:?}", self.position.as_slice());

        let transforms = match self.bird.as_mut() {
            Some(h) => {
                h.set_translation(BIRD_ROOT, self.position)?;
                h.set_linear(BIRD_ROOT, self.heading.into_inner())?;
                animate_bird(h, t)?;
                h.globals()
                    .map(|(name, g)| NodeTransform {
                        name: name.to_string(),
                        translation: g.translation,
                        linear: g.linear,
                        scale: 1.0,
                    })
                    .collect()
            }
            None => vec![NodeTransform {
                name: BIRD_ROOT.to_string(),
                translation: self.position,
                linear: self.heading.into_inner(),
                scale: 1.0,
            }],
        };

        Ok(Frame { time: t, transforms })
    }
}

fn to_keyframes(cfgs: &[KeyframeConfig]) -> Result<Vec<Keyframe>, SceneError> {
    cfgs.iter()
        .map(|k| Ok(Keyframe::new(k.position()?, k.t)))
        .collect()
}
