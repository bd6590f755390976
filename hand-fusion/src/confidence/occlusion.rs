//! Joint occlusion capability
//!
//! Occlusion is measured outside this crate, typically by rendering a
//! colour-coded proxy hand from each device's point of view and counting
//! how many pixels of every joint survive. The estimator only consults a
//! source when the occlusion weight is non-zero.

use crate::model::{Device, Hand, JointConfidences, JOINT_COUNT};

/// Pixels of one joint marker seen from a device, against the unoccluded count
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelCount {
    pub visible: u32,
    pub optimal: u32,
}

impl PixelCount {
    pub fn new(visible: u32, optimal: u32) -> Self {
        Self { visible, optimal }
    }

    /// Visible fraction in [0, 1]; joints without an expected count score 0
    pub fn ratio(self) -> f32 {
        if self.optimal == 0 {
            return 0.0;
        }
        (self.visible as f32 / self.optimal as f32).min(1.0)
    }
}

/// Source of per-joint visibility for a device and hand
pub trait JointOcclusion {
    /// None when the source has nothing for this device/hand this tick
    fn pixel_counts(&self, device: &Device, hand: &Hand) -> Option<[PixelCount; JOINT_COUNT]>;
}

pub fn occlusion_confidences(counts: &[PixelCount; JOINT_COUNT]) -> JointConfidences {
    std::array::from_fn(|i| counts[i].ratio())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        assert_eq!(PixelCount::new(4, 8).ratio(), 0.5);
        assert_eq!(PixelCount::new(3, 0).ratio(), 0.0);
        assert_eq!(PixelCount::new(12, 8).ratio(), 1.0);
    }

    #[test]
    fn test_confidences_per_joint() {
        let mut counts = [PixelCount::new(8, 8); JOINT_COUNT];
        counts[7] = PixelCount::new(2, 8);
        let confidences = occlusion_confidences(&counts);
        assert_eq!(confidences[0], 1.0);
        assert_eq!(confidences[7], 0.25);
    }
}
