//! Cross-device confidence normalization
//!
//! Within one hand side, confidences are divided by their sum so they act
//! as blend weights. When every device scored 0 the weights fall back to a
//! uniform split.

use crate::model::{JointConfidences, JOINT_COUNT};

/// Scale `confidences` to sum to 1, or to 1/k each when they sum to 0
pub fn normalize_confidences(confidences: &mut [f32]) {
    let count = confidences.len();
    if count == 0 {
        return;
    }

    let sum: f32 = confidences.iter().sum();
    if sum != 0.0 {
        confidences.iter_mut().for_each(|value| *value /= sum);
    } else {
        confidences.iter_mut().for_each(|value| *value = 1.0 / count as f32);
    }
}

/// Normalize each joint index independently across devices
pub fn normalize_joint_confidences(confidences: &mut [JointConfidences]) {
    let count = confidences.len();
    if count == 0 {
        return;
    }

    for joint in 0..JOINT_COUNT {
        let sum: f32 = confidences.iter().map(|hand| hand[joint]).sum();
        for hand in confidences.iter_mut() {
            hand[joint] = if sum != 0.0 {
                hand[joint] / sum
            } else {
                1.0 / count as f32
            };
        }
    }
}
