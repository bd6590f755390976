//! Confidence module - per-device trust in hand and joint observations
//!
//! Re-exports only. All logic in submodules.

mod estimator;
mod joints;
mod occlusion;
mod positional;
mod rotational;
mod velocity;

pub use estimator::ConfidenceEstimator;
pub use joints::{joint_rotation_confidences, joint_to_palm_confidences, smooth_along_fingers};
pub use occlusion::{occlusion_confidences, JointOcclusion, PixelCount};
pub use positional::{depth_amplitude, positional_confidence};
pub use rotational::{alignment_confidence, angle_between, facing_confidence, palm_rotation_confidence};
pub use velocity::{new_hand_ramp, velocity_confidence, TickClock};
