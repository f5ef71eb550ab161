pub mod keyframes;
pub mod orientation;
pub mod hierarchy;
