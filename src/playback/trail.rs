use std::collections::VecDeque;

use crate::render::Point;

/// Number of recent positions kept by default
pub const DEFAULT_TRAIL_LEN: usize = 15;

pub type TrailPoint = Point;

/// Bounded FIFO of recent center-of-pressure positions, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBuffer {
    points: VecDeque<TrailPoint>,
    capacity: usize,
}

impl TrailBuffer {
    /// A capacity of zero is bumped to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, point: TrailPoint) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
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

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TrailPoint> + ExactSizeIterator {
        self.points.iter()
    }
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_LEN)
    }
}
