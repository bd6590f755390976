//! Frame merger - blends every device's view of a hand into one pose
//!
//! Hands are grouped by side, their confidences normalized across the
//! group, and then:
//! - palm position is the confidence-weighted sum of positions
//! - palm rotation is blended incrementally, each step interpolating toward
//!   the next hand by its share of the cumulative weight
//! - joints are blended in palm-local space with per-joint weights and
//!   carried back to world space by the merged palm pose

use nalgebra::{UnitQuaternion, Vector3};
use tracing::debug;

use crate::model::{Hand, HandSide, JointConfidences, MergedFrame, MergedHand, Palm, JOINT_COUNT};

use super::normalize::{normalize_confidences, normalize_joint_confidences};

/// One device observation with its (unnormalized) confidences
#[derive(Clone, Debug)]
pub struct ScoredHand<'a> {
    pub hand: &'a Hand,
    pub confidence: f32,
    pub joint_confidences: JointConfidences,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FrameMerger;

impl FrameMerger {
    pub fn new() -> Self {
        Self
    }

    /// Merge all observations of a tick into at most one hand per side
    pub fn merge(&self, scored: &[ScoredHand<'_>]) -> MergedFrame {
        let mut hands = Vec::with_capacity(2);

        for side in HandSide::BOTH {
            let group: Vec<&ScoredHand<'_>> = scored.iter().filter(|s| s.hand.side == side).collect();
            if group.is_empty() {
                continue;
            }

            let observed: Vec<&Hand> = group.iter().map(|s| s.hand).collect();
            let mut confidences: Vec<f32> = group.iter().map(|s| s.confidence).collect();
            let mut joint_confidences: Vec<JointConfidences> =
                group.iter().map(|s| s.joint_confidences).collect();

            normalize_confidences(&mut confidences);
            normalize_joint_confidences(&mut joint_confidences);

            debug!(side = side.as_str(), contributors = group.len(), weights = ?confidences, "merging hand");

            if let Some(hand) = merge_hands(&observed, &confidences, &joint_confidences) {
                hands.push(hand);
            }
        }

        MergedFrame::new(hands)
    }
}

/// Blend hands of one side using already normalized weights
///
/// Returns None for an empty group. `confidences` and `joint_confidences`
/// must have one entry per hand.
pub fn merge_hands(
    hands: &[&Hand],
    confidences: &[f32],
    joint_confidences: &[JointConfidences],
) -> Option<MergedHand> {
    let first = hands.first()?;

    let mut position = Vector3::zeros();
    let mut rotation = first.palm.orientation;
    let mut cumulative = 0.0;
    for (i, (hand, &weight)) in hands.iter().zip(confidences).enumerate() {
        position += hand.palm.position * weight;
        if i > 0 {
            rotation = blend_rotation(&rotation, &hand.palm.orientation, cumulative, weight);
        }
        cumulative += weight;
    }

    let mut local_normal = Vector3::zeros();
    let mut local_joints = [Vector3::zeros(); JOINT_COUNT];
    for ((hand, &weight), joint_weights) in hands.iter().zip(confidences).zip(joint_confidences) {
        local_normal += (hand.palm.orientation.inverse() * hand.palm.normal) * weight;

        for (merged, (local, joint_weight)) in local_joints
            .iter_mut()
            .zip(hand.local_joint_positions().iter().zip(joint_weights))
        {
            *merged += local * *joint_weight;
        }
    }
    let local_normal = local_normal
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(|| first.palm.orientation.inverse() * first.palm.normal);

    let joints = local_joints.map(|local| rotation * local + position);

    Some(MergedHand {
        side: first.side,
        palm: Palm {
            position,
            orientation: rotation,
            normal: rotation * local_normal,
        },
        joints,
        contributors: hands.len(),
    })
}

/// Interpolate from the running blend toward `next`
///
/// `accumulated` is the total weight already folded into `current`, so the
/// step size is next's share of the new total. Uses normalized lerp along
/// the shorter arc.
fn blend_rotation(
    current: &UnitQuaternion<f32>,
    next: &UnitQuaternion<f32>,
    accumulated: f32,
    weight: f32,
) -> UnitQuaternion<f32> {
    let total = accumulated + weight;
    if total <= 0.0 {
        return *current;
    }
    let t = weight / total;

    let from = current.into_inner();
    let mut to = next.into_inner();
    if from.coords.dot(&to.coords) < 0.0 {
        to = -to;
    }
    UnitQuaternion::new_normalize(from * (1.0 - t) + to * t)
}
