//! Hand pose data as reported by a single tracking device
//!
//! Positions are in shared world space (meters). Each digit carries four
//! bones: metacarpal, proximal, intermediate, distal. The thumb reports a
//! zero-length metacarpal.

use nalgebra::{UnitQuaternion, Vector3};

// ============================================================================
// JOINT INDEXING
// ============================================================================

/// Digits per hand (thumb first)
pub const DIGIT_COUNT: usize = 5;

/// Bones reported per digit
pub const BONES_PER_DIGIT: usize = 4;

/// Joint slots per digit: metacarpal base plus the distal end of each bone
pub const JOINTS_PER_DIGIT: usize = BONES_PER_DIGIT + 1;

/// Total joints tracked per hand
pub const JOINT_COUNT: usize = DIGIT_COUNT * JOINTS_PER_DIGIT;

/// One confidence per joint, indexed by [`joint_index`]
pub type JointConfidences = [f32; JOINT_COUNT];

/// Flat joint index for digit `finger` and joint slot `slot`
///
/// Slot 0 is the base of the metacarpal, slot `n >= 1` is the distal joint
/// of bone `n - 1`.
pub const fn joint_index(finger: usize, slot: usize) -> usize {
    finger * JOINTS_PER_DIGIT + slot
}

/// Digit names in reporting order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; DIGIT_COUNT] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Bone-local axis that points out of the back of this digit
    ///
    /// The thumb's bone basis is rolled relative to the other fingers, so its
    /// outward direction is local +Y instead of local -X.
    pub fn outward_axis(self) -> Vector3<f32> {
        match self {
            Finger::Thumb => Vector3::y(),
            _ => -Vector3::x(),
        }
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub const BOTH: [HandSide; 2] = [HandSide::Left, HandSide::Right];

    /// Array slot for per-side storage (left = 0, right = 1)
    pub fn index(self) -> usize {
        match self {
            HandSide::Left => 0,
            HandSide::Right => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandSide::Left => "left",
            HandSide::Right => "right",
        }
    }
}

/// One finger segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bone {
    /// Joint nearest the palm
    pub prev_joint: Vector3<f32>,
    /// Joint furthest from the palm
    pub next_joint: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl Default for Bone {
    fn default() -> Self {
        Self {
            prev_joint: Vector3::zeros(),
            next_joint: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Digit {
    pub bones: [Bone; BONES_PER_DIGIT],
}

/// Palm pose: position, orientation and the outward-facing normal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palm {
    pub position: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
    pub normal: Vector3<f32>,
}

impl Default for Palm {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            normal: -Vector3::z(),
        }
    }
}

/// One device's observation of one hand during a tick
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    pub side: HandSide,
    pub palm: Palm,
    pub digits: [Digit; DIGIT_COUNT],
}

impl Hand {
    pub fn new(side: HandSide, palm: Palm, digits: [Digit; DIGIT_COUNT]) -> Self {
        Self { side, palm, digits }
    }

    /// World position of joint `index`
    pub fn joint_position(&self, index: usize) -> Vector3<f32> {
        let digit = &self.digits[index / JOINTS_PER_DIGIT];
        match index % JOINTS_PER_DIGIT {
            0 => digit.bones[0].prev_joint,
            slot => digit.bones[slot - 1].next_joint,
        }
    }

    /// Rotation of the bone that owns joint `index`
    ///
    /// The metacarpal base shares the metacarpal's rotation.
    pub fn joint_rotation(&self, index: usize) -> UnitQuaternion<f32> {
        let digit = &self.digits[index / JOINTS_PER_DIGIT];
        let slot = index % JOINTS_PER_DIGIT;
        digit.bones[slot.saturating_sub(1)].rotation
    }

    /// Outward normal of joint `index` in world space
    pub fn joint_normal(&self, index: usize) -> Vector3<f32> {
        let finger = Finger::ALL[index / JOINTS_PER_DIGIT];
        self.joint_rotation(index) * finger.outward_axis()
    }

    /// All joint positions expressed relative to the palm pose
    pub fn local_joint_positions(&self) -> [Vector3<f32>; JOINT_COUNT] {
        let inverse = self.palm.orientation.inverse();
        std::array::from_fn(|i| inverse * (self.joint_position(i) - self.palm.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn digit_along_x(offset: f32) -> Digit {
        let mut digit = Digit::default();
        for (i, bone) in digit.bones.iter_mut().enumerate() {
            bone.prev_joint = Vector3::new(i as f32, offset, 0.0);
            bone.next_joint = Vector3::new(i as f32 + 1.0, offset, 0.0);
        }
        digit
    }

    #[test]
    fn test_joint_index_layout() {
        assert_eq!(joint_index(0, 0), 0);
        assert_eq!(joint_index(1, 0), 5);
        assert_eq!(joint_index(4, 4), JOINT_COUNT - 1);
    }

    #[test]
    fn test_joint_positions_follow_bones() {
        let digits = std::array::from_fn(|f| digit_along_x(f as f32));
        let hand = Hand::new(HandSide::Left, Palm::default(), digits);

        assert_eq!(hand.joint_position(joint_index(2, 0)), Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(hand.joint_position(joint_index(2, 4)), Vector3::new(4.0, 2.0, 0.0));
    }

    #[test]
    fn test_local_joints_undo_palm_pose() {
        let digits = std::array::from_fn(|f| digit_along_x(f as f32));
        let palm = Palm {
            position: Vector3::new(1.0, 0.0, 0.0),
            orientation: UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
            ..Palm::default()
        };
        let hand = Hand::new(HandSide::Right, palm, digits);

        // world (0, 1, 0) sits at (-1, 1, 0) from the palm, rotated back by -90° about z
        let local = hand.local_joint_positions();
        assert_relative_eq!(local[joint_index(1, 0)], Vector3::new(1.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_thumb_uses_rolled_axis() {
        let hand = Hand::new(HandSide::Left, Palm::default(), [Digit::default(); DIGIT_COUNT]);
        assert_eq!(hand.joint_normal(joint_index(0, 2)), Vector3::y());
        assert_eq!(hand.joint_normal(joint_index(3, 2)), -Vector3::x());
    }
}
