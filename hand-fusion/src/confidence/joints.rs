//! Per-joint confidence sub-scores

use crate::model::{joint_index, Device, Hand, JointConfidences, DIGIT_COUNT, JOINTS_PER_DIGIT};

use super::rotational::{alignment_confidence, angle_between, facing_confidence};

/// Each joint's outward normal against the direction from the device to the joint
pub fn joint_rotation_confidences(device: &Device, hand: &Hand) -> JointConfidences {
    let origin = device.origin.translation.vector;
    std::array::from_fn(|i| {
        let from_device = hand.joint_position(i) - origin;
        angle_between(&from_device, &hand.joint_normal(i)).map_or(0.0, facing_confidence)
    })
}

/// Each joint's outward normal against the palm normal
pub fn joint_to_palm_confidences(hand: &Hand) -> JointConfidences {
    std::array::from_fn(|i| {
        angle_between(&hand.palm.normal, &hand.joint_normal(i)).map_or(0.0, alignment_confidence)
    })
}

/// Average each joint with the already smoothed joint before it on the same digit
///
/// A poorly seen knuckle should also pull down trust in the rest of the
/// finger. The metacarpal base (slot 0) is left alone.
pub fn smooth_along_fingers(confidences: &mut JointConfidences) {
    for finger in 0..DIGIT_COUNT {
        for slot in 1..JOINTS_PER_DIGIT {
            let index = joint_index(finger, slot);
            confidences[index] = (confidences[index] + confidences[index - 1]) / 2.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bone, Digit, DeviceType, HandSide, Palm, JOINT_COUNT};
    use approx::assert_relative_eq;
    use nalgebra::{Isometry3, UnitQuaternion, Vector3};

    /// Flat hand 30cm in front of a device at the origin, palm facing it
    fn flat_hand() -> Hand {
        let digits = std::array::from_fn(|f| {
            let mut digit = Digit::default();
            for (b, bone) in digit.bones.iter_mut().enumerate() {
                let y = f as f32 * 0.02;
                *bone = Bone {
                    prev_joint: Vector3::new(0.3, y, b as f32 * 0.02),
                    next_joint: Vector3::new(0.3, y, (b + 1) as f32 * 0.02),
                    rotation: UnitQuaternion::identity(),
                };
            }
            digit
        });
        let palm = Palm {
            position: Vector3::new(0.3, 0.0, 0.0),
            normal: -Vector3::x(),
            ..Palm::default()
        };
        Hand::new(HandSide::Left, palm, digits)
    }

    #[test]
    fn test_finger_smoothing_chain() {
        let mut confidences = [0.0; JOINT_COUNT];
        let raw = [1.0, 0.0, 1.0, 0.0, 1.0];
        for (slot, value) in raw.iter().enumerate() {
            confidences[joint_index(2, slot)] = *value;
        }
        smooth_along_fingers(&mut confidences);

        let smoothed: Vec<f32> = (0..5).map(|slot| confidences[joint_index(2, slot)]).collect();
        assert_eq!(smoothed[0], 1.0);
        for slot in 1..5 {
            assert_relative_eq!(smoothed[slot], (raw[slot] + smoothed[slot - 1]) / 2.0);
        }
        // neighbouring digits untouched
        assert_eq!(confidences[joint_index(1, 4)], 0.0);
    }

    #[test]
    fn test_fingers_facing_device_score_high() {
        let device = Device::new("d", DeviceType::Rigel, Isometry3::identity());
        let hand = flat_hand();
        let confidences = joint_rotation_confidences(&device, &hand);

        // finger normals are -X, pointing back at the sensor
        for finger in 1..DIGIT_COUNT {
            let conf = confidences[joint_index(finger, 3)];
            assert!(conf > 0.8, "finger {finger} scored {conf}");
        }
        // the thumb's outward axis is +Y, roughly edge-on to the sensor
        assert!(confidences[joint_index(0, 3)] < 0.1);
    }

    #[test]
    fn test_joint_aligned_with_palm() {
        let hand = flat_hand();
        let confidences = joint_to_palm_confidences(&hand);
        assert_relative_eq!(confidences[joint_index(3, 2)], 1.0);
        assert_relative_eq!(confidences[joint_index(0, 2)], 0.5, epsilon = 1e-6);
    }
}
