//! Palm position history for velocity estimation
//!
//! Keeps the last N (position, timestamp) samples. The oldest retained
//! sample gives a velocity over the whole window, which is far less noisy
//! than a frame-to-frame difference.

use std::collections::VecDeque;

use nalgebra::Vector3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionSample {
    pub position: Vector3<f32>,
    /// Seconds on the caller's monotonic clock
    pub time: f64,
}

#[derive(Clone, Debug)]
pub struct PositionHistory {
    samples: VecDeque<PositionSample>,
    capacity: usize,
}

impl PositionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, position: Vector3<f32>, time: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(PositionSample { position, time });
    }

    pub fn oldest(&self) -> Option<PositionSample> {
        self.samples.front().copied()
    }

    /// Oldest sample together with its age at `now`
    pub fn oldest_with_age(&self, now: f64) -> Option<(PositionSample, f64)> {
        self.oldest().map(|sample| (sample, now - sample.time))
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
