//! Error type shared by the interpolator, the integrator and scene setup
//!
//! Every failure here is local and synchronous: a malformed scene is rejected
//! while it is being built, and a numerical fault halts the scene that hit it

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    // ----- keyframe construction -----
    #[error("a keyframe track needs at least {min} keyframes, got {len}")]
    TooFewKeyframes { len: usize, min: usize },

    #[error("keyframe times must be strictly increasing (index {index}: {prev} -> {next})")]
    NonMonotonicTime { index: usize, prev: f64, next: f64 },

    #[error("spline tension must lie in (0, 1], got {0}")]
    InvalidTension(f64),

    // ----- keyframe queries -----
    #[error("time {time} lies outside the keyframe range [{min}, {max})")]
    TimeOutOfRange { time: f64, min: f64, max: f64 },

    #[error("time {time} lies outside the interpolable range [{min}, {max})")]
    OutsideInteriorRange { time: f64, min: f64, max: f64 },

    // ----- physics -----
    #[error("body `{body}` is closer than {min_separation} to attractor `{attractor}`")]
    ZeroDistance {
        body: String,
        attractor: String,
        min_separation: f64,
    },

    #[error("body `{0}` reached a non-finite state")]
    NonFiniteState(String),

    // ----- setup -----
    #[error("body `{name}` is invalid: {reason}")]
    InvalidBody { name: String, reason: String },

    #[error("unknown body `{0}`")]
    UnknownBody(String),

    #[error("unknown hierarchy node `{0}`")]
    UnknownNode(String),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("no gravitational constant: set either `G` or `units` in the parameters")]
    MissingGravity,
}
