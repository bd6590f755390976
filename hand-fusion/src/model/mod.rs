//! Model module - hands, devices and frames
//!
//! Re-exports only. All logic in submodules.

mod device;
mod frame;
mod hand;

pub use device::{Device, DeviceDescriptor, DeviceId, DeviceProfile, DeviceType};
pub use frame::{DeviceFrame, MergedFrame, MergedHand};
pub use hand::{
    joint_index, Bone, Digit, Finger, Hand, HandSide, JointConfidences, Palm,
    BONES_PER_DIGIT, DIGIT_COUNT, JOINTS_PER_DIGIT, JOINT_COUNT,
};
