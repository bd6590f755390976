//! Rolling sample buffer with window-mean retrieval
//!
//! Smooths hand and joint confidences over the last N ticks for one
//! (device, hand side) pairing.

use std::collections::VecDeque;

/// Values that can be averaged component-wise
pub trait Sample: Copy {
    fn zero() -> Self;
    fn accumulate(&mut self, other: &Self);
    fn scale(&mut self, factor: f32);
}

impl Sample for f32 {
    fn zero() -> Self {
        0.0
    }

    fn accumulate(&mut self, other: &Self) {
        *self += *other;
    }

    fn scale(&mut self, factor: f32) {
        *self *= factor;
    }
}

impl<const N: usize> Sample for [f32; N] {
    fn zero() -> Self {
        [0.0; N]
    }

    fn accumulate(&mut self, other: &Self) {
        for (value, add) in self.iter_mut().zip(other) {
            *value += *add;
        }
    }

    fn scale(&mut self, factor: f32) {
        for value in self.iter_mut() {
            *value *= factor;
        }
    }
}

/// Fixed-capacity FIFO: pushing past capacity evicts the oldest sample
#[derive(Clone, Debug)]
pub struct HistoryBuffer<T> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T: Sample> HistoryBuffer<T> {
    /// A zero capacity is raised to 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: T) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Arithmetic mean over the retained window, None when empty
    pub fn mean(&self) -> Option<T> {
        if self.samples.is_empty() {
            return None;
        }

        let mut sum = T::zero();
        for sample in &self.samples {
            sum.accumulate(sample);
        }
        sum.scale(1.0 / self.samples.len() as f32);
        Some(sum)
    }

    /// Push then return the new window mean
    pub fn push_and_mean(&mut self, sample: T) -> T {
        self.push(sample);
        self.mean().unwrap_or(sample)
    }

    /// Change capacity in place, keeping the newest samples
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn newest(&self) -> Option<&T> {
        self.samples.back()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
