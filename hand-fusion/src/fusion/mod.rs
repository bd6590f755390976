//! Fusion module - per-tick scoring, normalization and blending
//!
//! Re-exports only. All logic in submodules.

mod engine;
mod merger;
mod normalize;

pub use engine::FusionEngine;
pub use merger::{merge_hands, FrameMerger, ScoredHand};
pub use normalize::{normalize_confidences, normalize_joint_confidences};
