//! Kinematic confidence: hand speed and time since first seen
//!
//! Fast hands blur and get mis-tracked, and freshly detected hands are
//! often false positives. Both scores degrade to 0 without enough history.

use nalgebra::Vector3;

use crate::history::PositionHistory;

/// Timing of the current fusion tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickClock {
    /// Seconds on the caller's monotonic clock
    pub now: f64,
    /// Seconds since the previous tick
    pub interval: f64,
}

impl TickClock {
    pub fn new(now: f64, interval: f64) -> Self {
        Self { now, interval }
    }
}

/// Confidence from speed over the retained position window
///
/// 0 when there is no earlier sample or the oldest one is older than
/// `staleness_ticks` tick intervals. Otherwise falls linearly from 1 at rest
/// to 0 at `cutoff` units per second.
pub fn velocity_confidence(
    history: &PositionHistory,
    position: &Vector3<f32>,
    clock: &TickClock,
    staleness_ticks: u32,
    cutoff: f32,
) -> f32 {
    let Some((oldest, age)) = history.oldest_with_age(clock.now) else {
        return 0.0;
    };
    if age <= 0.0 || age > clock.interval * f64::from(staleness_ticks) {
        return 0.0;
    }

    let speed = (position - oldest.position).norm() / age as f32;
    (1.0 - speed / cutoff).clamp(0.0, 1.0)
}

/// Linear ramp from 0 to 1 over the first `ramp_seconds` of visibility
pub fn new_hand_ramp(time_visible: Option<f64>, ramp_seconds: f64) -> f32 {
    match time_visible {
        Some(visible) => (visible / ramp_seconds).clamp(0.0, 1.0) as f32,
        None => 0.0,
    }
}
