//! Per-tick inputs and the merged output frame

use nalgebra::Vector3;

use super::device::DeviceId;
use super::hand::{joint_index, Hand, HandSide, Palm, JOINT_COUNT};

/// Everything one device saw during a tick
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceFrame {
    pub device: DeviceId,
    pub hands: Vec<Hand>,
}

impl DeviceFrame {
    pub fn new(device: impl Into<DeviceId>, hands: Vec<Hand>) -> Self {
        Self {
            device: device.into(),
            hands,
        }
    }

    pub fn sees(&self, side: HandSide) -> bool {
        self.hands.iter().any(|hand| hand.side == side)
    }
}

/// A fused hand: world-space palm pose plus all joint positions
#[derive(Clone, Debug, PartialEq)]
pub struct MergedHand {
    pub side: HandSide,
    pub palm: Palm,
    pub joints: [Vector3<f32>; JOINT_COUNT],
    /// Number of device observations blended into this hand
    pub contributors: usize,
}

impl MergedHand {
    pub fn joint(&self, finger: usize, slot: usize) -> Vector3<f32> {
        self.joints[joint_index(finger, slot)]
    }
}

/// Result of one fusion tick, at most one hand per side
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergedFrame {
    pub hands: Vec<MergedHand>,
    pub hand_count: usize,
}

impl MergedFrame {
    pub fn new(hands: Vec<MergedHand>) -> Self {
        let hand_count = hands.len();
        Self { hands, hand_count }
    }

    pub fn hand(&self, side: HandSide) -> Option<&MergedHand> {
        self.hands.iter().find(|hand| hand.side == side)
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}
