//! Scene clock
//!
//! Advances by elapsed real time times a playback scale and wraps back to
//! `t_min` once it reaches `t_max`. Orbital scenes use a free-running timer
//! (`t_max = inf`) and only read its scale.

use crate::error::SceneError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalTimer {
    pub t: f64,
    pub t_min: f64,
    pub t_max: f64,
    pub scale: f64,
}

impl IntervalTimer {
    /// Timer looping over `[t_min, t_max)`, starting at `t_min`
    pub fn new(t_min: f64, t_max: f64, scale: f64) -> Result<Self, SceneError> {
        if !(t_min < t_max) {
            return Err(SceneError::InvalidParameter {
                name: "timer",
                reason: format!("empty interval [{t_min}, {t_max})"),
            });
        }
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(SceneError::InvalidParameter {
                name: "timer.scale",
                reason: format!("must be positive and finite, got {scale}"),
            });
        }
        Ok(Self {
            t: t_min,
            t_min,
            t_max,
            scale,
        })
    }

    pub fn free_running(scale: f64) -> Result<Self, SceneError> {
        Self::new(0.0, f64::INFINITY, scale)
    }

    /// Advance by `elapsed` seconds of real time.
    /// Returns true when the timer wrapped back to `t_min`
    pub fn update(&mut self, elapsed: f64) -> Result<bool, SceneError> {
        if !(elapsed >= 0.0 && elapsed.is_finite()) {
            return Err(SceneError::InvalidParameter {
                name: "elapsed",
                reason: format!("frame time must be non-negative and finite, got {elapsed}"),
            });
        }
        self.t += elapsed * self.scale;
        if self.t >= self.t_max {
            self.t = self.t_min;
            return Ok(true);
        }
        Ok(false)
    }
}
