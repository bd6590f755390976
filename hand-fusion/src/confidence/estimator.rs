//! Confidence estimator - combines the sub-scores for one device observation
//!
//! Hand confidence = weighted positional + rotational + velocity scores,
//! optionally ramped in for new hands, then averaged over the hand history.
//! Joint confidence = weighted joint-rotation + joint-to-palm + occlusion
//! scores, smoothed along each finger, then averaged over the joint history.

use tracing::trace;

use crate::config::FusionConfig;
use crate::history::SideHistory;
use crate::model::{Device, Hand, JointConfidences, JOINT_COUNT};

use super::joints::{joint_rotation_confidences, joint_to_palm_confidences, smooth_along_fingers};
use super::occlusion::{occlusion_confidences, JointOcclusion};
use super::positional::positional_confidence;
use super::rotational::palm_rotation_confidence;
use super::velocity::{new_hand_ramp, velocity_confidence, TickClock};

pub struct ConfidenceEstimator {
    config: FusionConfig,
    occlusion: Option<Box<dyn JointOcclusion>>,
}

impl ConfidenceEstimator {
    pub fn new(config: FusionConfig) -> Self {
        Self {
            config,
            occlusion: None,
        }
    }

    pub fn with_occlusion(mut self, source: Box<dyn JointOcclusion>) -> Self {
        self.occlusion = Some(source);
        self
    }

    pub fn set_occlusion(&mut self, source: Option<Box<dyn JointOcclusion>>) {
        self.occlusion = source;
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: FusionConfig) {
        self.config = config;
    }

    /// Combined hand score for this tick, before history smoothing
    ///
    /// Reads the position history and visibility of `history` but does not
    /// modify them.
    pub fn raw_hand_confidence(
        &self,
        device: &Device,
        history: &SideHistory,
        hand: &Hand,
        clock: &TickClock,
    ) -> f32 {
        let weights = &self.config.weights;
        let position = &hand.palm.position;
        let mut confidence = 0.0;

        if weights.palm_position != 0.0 {
            confidence += weights.palm_position * positional_confidence(device, position);
        }
        if weights.palm_rotation != 0.0 {
            confidence += weights.palm_rotation * palm_rotation_confidence(device, &hand.palm);
        }
        if weights.palm_velocity != 0.0 {
            confidence += weights.palm_velocity
                * velocity_confidence(
                    &history.positions,
                    position,
                    clock,
                    self.config.staleness_ticks,
                    self.config.velocity_cutoff,
                );
        }

        if self.config.ignore_recent_new_hands {
            let visible = history.time_visible(clock.now);
            confidence *= new_hand_ramp(visible, self.config.new_hand_ramp_seconds);
        }

        confidence
    }

    /// Hand confidence averaged over the (device, side) history window
    pub fn hand_confidence(
        &self,
        device: &Device,
        history: &mut SideHistory,
        hand: &Hand,
        clock: &TickClock,
    ) -> f32 {
        let raw = self.raw_hand_confidence(device, history, hand, clock);
        let smoothed = history.hand_confidence.push_and_mean(raw);
        trace!(device = %device.id, side = hand.side.as_str(), raw, smoothed, "hand confidence");
        smoothed
    }

    /// Combined per-joint scores for this tick, finger-smoothed but not history-smoothed
    pub fn raw_joint_confidences(&self, device: &Device, hand: &Hand) -> JointConfidences {
        let weights = &self.config.weights;
        let mut confidences = [0.0; JOINT_COUNT];

        if weights.joint_rotation != 0.0 {
            accumulate(&mut confidences, &joint_rotation_confidences(device, hand), weights.joint_rotation);
        }
        if weights.joint_rotation_to_palm != 0.0 {
            accumulate(&mut confidences, &joint_to_palm_confidences(hand), weights.joint_rotation_to_palm);
        }
        if weights.joint_occlusion != 0.0 {
            let counts = self
                .occlusion
                .as_ref()
                .and_then(|source| source.pixel_counts(device, hand));
            if let Some(counts) = counts {
                accumulate(&mut confidences, &occlusion_confidences(&counts), weights.joint_occlusion);
            }
        }

        smooth_along_fingers(&mut confidences);
        confidences
    }

    /// Joint confidences averaged over the (device, side) joint history window
    pub fn joint_confidences(
        &self,
        device: &Device,
        history: &mut SideHistory,
        hand: &Hand,
    ) -> JointConfidences {
        let raw = self.raw_joint_confidences(device, hand);
        history.joint_confidence.push_and_mean(raw)
    }
}

fn accumulate(total: &mut JointConfidences, scores: &JointConfidences, weight: f32) {
    for (value, score) in total.iter_mut().zip(scores) {
        *value += weight * score;
    }
}
