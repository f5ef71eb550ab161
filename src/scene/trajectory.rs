//! Bounded trace of recent positions, drawn behind a moving body

use std::collections::VecDeque;

use crate::simulation::states::NVec3;

/// Positions kept when the scene file does not say otherwise
pub const DEFAULT_TRACE_CAPACITY: usize = 100;

/// Largest trace a scene file may ask for
pub const MAX_TRACE_CAPACITY: usize = 100_000;

#[derive(Debug, Clone)]
pub struct Trajectory {
    points: VecDeque<NVec3>,
    capacity: usize,
}

impl Trajectory {
    pub fn new(capacity: usize) -> Self {
        Self {
            // grows on demand past the default
            points: VecDeque::with_capacity(capacity.min(DEFAULT_TRACE_CAPACITY)),
            capacity,
        }
    }

    /// Append a point, dropping the oldest once full
    pub fn push(&mut self, p: NVec3) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(p);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    pub fn points(&self) -> impl Iterator<Item = &NVec3> {
        self.points.iter()
    }
}
