//! # Cardinal-spline keyframe interpolation
//!
//! A [`KeyframeTrack`] is an ordered list of `(position, time)` keyframes with
//! strictly increasing times. The first and last entries are *phantom* control
//! points: they only shape the tangents of the neighbouring segments and are
//! never reached by a query.
//!
//! ## Evaluation
//!
//! For a query time `t` in segment `i` (`t_i <= t < t_{i+1}`) the four control
//! points `p0..p3 = k[i-1..=i+2]` give
//!
//! - local parameter `s = (t - t1) / (t2 - t1)`
//! - tangents `d1 = 2K (p2 - p0) / (t2 - t0)` and `d2 = 2K (p3 - p1) / (t3 - t1)`
//! - position `h00(s) p1 + h10(s) d1 + h01(s) p2 + h11(s) d2`
//!
//! with the cubic Hermite basis. Velocity is the derivative of the same
//! expression in `s`, times `ds/dt = 1 / (t2 - t1)`.
//!
//! ## Valid query range
//!
//! Tangents need one neighbour on each side, so only
//! `[k[1].time, k[N-2].time)` can be evaluated. Anything outside is an error,
//! never clamped.

use crate::error::SceneError;
use crate::simulation::states::NVec3;

/// Smallest track that still has one interpolable segment
pub const MIN_KEYFRAMES: usize = 4;

/// Tension used by the flight scene unless configured otherwise
pub const DEFAULT_TENSION: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub position: NVec3,
    pub time: f64,
}

impl Keyframe {
    pub fn new(position: NVec3, time: f64) -> Self {
        Self { position, time }
    }
}

/// Validated keyframe sequence with a spline tension `K`
#[derive(Debug, Clone)]
pub struct KeyframeTrack {
    keyframes: Vec<Keyframe>,
    tension: f64,
}

impl KeyframeTrack {
    /// Build a track from an already padded keyframe list.
    /// Rejects fewer than four keyframes, non-increasing times and a tension
    /// outside (0, 1]
    pub fn new(keyframes: Vec<Keyframe>, tension: f64) -> Result<Self, SceneError> {
        if !(tension > 0.0 && tension <= 1.0) {
            return Err(SceneError::InvalidTension(tension));
        }
        if keyframes.len() < MIN_KEYFRAMES {
            return Err(SceneError::TooFewKeyframes {
                len: keyframes.len(),
                min: MIN_KEYFRAMES,
            });
        }
        for (index, pair) in keyframes.windows(2).enumerate() {
            let (prev, next) = (pair[0].time, pair[1].time);
            // `!(a < b)` also rejects NaN times
            if !(prev < next) {
                return Err(SceneError::NonMonotonicTime {
                    index: index + 1,
                    prev,
                    next,
                });
            }
        }
        if let Some(bad) = keyframes.iter().find(|k| !k.position.iter().all(|c| c.is_finite())) {
            return Err(SceneError::InvalidParameter {
                name: "keyframes",
                reason: format!("non-finite position at time {}", bad.time),
            });
        }
        Ok(Self { keyframes, tension })
    }

    /// Build a closed loop from the points actually visited.
    ///
    /// `points` are visited in order and the path returns to `points[0]` at
    /// time `end`. Phantom keyframes are added on both sides so the curve
    /// leaves and re-enters `points[0]` with the same tangent:
    ///
    /// `[p_{m-1}, p_0, .., p_{m-1}, p_0, p_1]`
    pub fn closed_loop(points: &[Keyframe], end: f64, tension: f64) -> Result<Self, SceneError> {
        let m = points.len();
        if m < 2 {
            return Err(SceneError::TooFewKeyframes {
                len: m,
                min: 2,
            });
        }
        let first = points[0];
        let second = points[1];
        let last = points[m - 1];

        let mut keyframes = Vec::with_capacity(m + 3);
        // phantom before the start mirrors the closing segment
        keyframes.push(Keyframe::new(last.position, first.time - (end - last.time)));
        keyframes.extend_from_slice(points);
        keyframes.push(Keyframe::new(first.position, end));
        // phantom after the end mirrors the opening segment
        keyframes.push(Keyframe::new(second.position, end + (second.time - first.time)));

        Self::new(keyframes, tension)
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn tension(&self) -> f64 {
        self.tension
    }

    /// Range that can be interpolated: `[k[1].time, k[N-2].time)`
    pub fn interior_range(&self) -> (f64, f64) {
        let n = self.keyframes.len();
        (self.keyframes[1].time, self.keyframes[n - 2].time)
    }

    /// Index `i` with `k[i].time <= time < k[i+1].time`.
    ///
    /// Linear scan from the start, O(N). Tracks are a handful of keyframes
    pub fn locate_segment(&self, time: f64) -> Result<usize, SceneError> {
        locate_segment(time, &self.keyframes)
    }

    pub fn interpolate_position(&self, time: f64) -> Result<NVec3, SceneError> {
        let c = self.controls(time)?;
        let s = c.local_parameter(time);
        let (s2, s3) = (s * s, s * s * s);

        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        Ok(h00 * c.p1 + h10 * c.d1 + h01 * c.p2 + h11 * c.d2)
    }

    pub fn interpolate_velocity(&self, time: f64) -> Result<NVec3, SceneError> {
        let c = self.controls(time)?;
        let s = c.local_parameter(time);
        let s2 = s * s;

        // d/ds of the Hermite basis
        let dh00 = 6.0 * s2 - 6.0 * s;
        let dh10 = 3.0 * s2 - 4.0 * s + 1.0;
        let dh01 = -6.0 * s2 + 6.0 * s;
        let dh11 = 3.0 * s2 - 2.0 * s;
        let ds_dt = 1.0 / (c.t2 - c.t1);

        Ok((dh00 * c.p1 + dh10 * c.d1 + dh01 * c.p2 + dh11 * c.d2) * ds_dt)
    }

    fn controls(&self, time: f64) -> Result<SegmentControls, SceneError> {
        let (min, max) = self.interior_range();
        if !(time >= min && time < max) {
            return Err(SceneError::OutsideInteriorRange { time, min, max });
        }

        let i = self.locate_segment(time)?;
        let k = &self.keyframes;
        let (k0, k1, k2, k3) = (k[i - 1], k[i], k[i + 1], k[i + 2]);
        let two_k = 2.0 * self.tension;

        Ok(SegmentControls {
            t1: k1.time,
            t2: k2.time,
            p1: k1.position,
            p2: k2.position,
            d1: two_k * (k2.position - k0.position) / (k2.time - k0.time),
            d2: two_k * (k3.position - k1.position) / (k3.time - k1.time),
        })
    }
}

/// Segment lookup over any keyframe slice.
/// Fails when `time` is outside `[k[0].time, k[N-1].time)`
pub fn locate_segment(time: f64, keyframes: &[Keyframe]) -> Result<usize, SceneError> {
    let n = keyframes.len();
    if n < 2 {
        return Err(SceneError::TooFewKeyframes { len: n, min: 2 });
    }

    let (min, max) = (keyframes[0].time, keyframes[n - 1].time);
    if !(time >= min && time < max) {
        return Err(SceneError::TimeOutOfRange { time, min, max });
    }

    let mut i = 0;
    while keyframes[i + 1].time <= time {
        i += 1;
    }
    Ok(i)
}

struct SegmentControls {
    t1: f64,
    t2: f64,
    p1: NVec3,
    p2: NVec3,
    d1: NVec3,
    d2: NVec3,
}

impl SegmentControls {
    fn local_parameter(&self, time: f64) -> f64 {
        (time - self.t1) / (self.t2 - self.t1)
    }
}
