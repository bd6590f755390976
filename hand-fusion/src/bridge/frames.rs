//! Flat f32 buffer codec for the host boundary
//!
//! Input (device frames):
//! `[frame_count, per frame: device_index, hand_count, per hand: HAND]`
//! where HAND is `side(0=left,1=right), palm pos(3), palm quat xyzw(4),
//! palm normal(3)` followed by 5 digits × 4 bones of
//! `prev(3), next(3), quat xyzw(4)`, digit-major.
//!
//! Output (merged frame):
//! `[hand_count, per hand: side, palm pos(3), palm quat xyzw(4),
//! palm normal(3), 25 joints × 3]`.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::error::{FusionError, Result};
use crate::model::{
    Bone, Device, DeviceFrame, Digit, Hand, HandSide, MergedFrame, Palm, BONES_PER_DIGIT,
    DIGIT_COUNT, JOINT_COUNT,
};

// ============================================================================
// LAYOUT CONSTANTS
// ============================================================================

/// Floats per bone: prev joint, next joint, rotation
pub const BONE_STRIDE: usize = 3 + 3 + 4;

/// Floats per input hand
pub const HAND_STRIDE: usize = 1 + 3 + 4 + 3 + DIGIT_COUNT * BONES_PER_DIGIT * BONE_STRIDE;

/// Floats per output hand
pub const MERGED_HAND_STRIDE: usize = 1 + 3 + 4 + 3 + JOINT_COUNT * 3;

// ============================================================================
// ENCODE
// ============================================================================

pub fn encode_merged_frame(frame: &MergedFrame) -> Vec<f32> {
    let mut out = Vec::with_capacity(1 + frame.hands.len() * MERGED_HAND_STRIDE);
    out.push(frame.hands.len() as f32);

    for hand in &frame.hands {
        out.push(side_code(hand.side));
        out.extend_from_slice(hand.palm.position.as_slice());
        push_quaternion(&mut out, &hand.palm.orientation);
        out.extend_from_slice(hand.palm.normal.as_slice());
        for joint in &hand.joints {
            out.extend_from_slice(joint.as_slice());
        }
    }
    out
}

fn side_code(side: HandSide) -> f32 {
    match side {
        HandSide::Left => 0.0,
        HandSide::Right => 1.0,
    }
}

fn push_quaternion(out: &mut Vec<f32>, rotation: &UnitQuaternion<f32>) {
    let q = rotation.quaternion();
    out.extend_from_slice(&[q.i, q.j, q.k, q.w]);
}

// ============================================================================
// DECODE
// ============================================================================

/// Decode one tick of device frames
///
/// `device_index` entries refer to positions in `devices`.
pub fn decode_device_frames(data: &[f32], devices: &[Device]) -> Result<Vec<DeviceFrame>> {
    let mut reader = FrameReader::new(data);
    let frame_count = reader.count("frame count")?;
    let mut frames = Vec::with_capacity(frame_count.min(devices.len()));

    for _ in 0..frame_count {
        let offset = reader.offset;
        let device_index = reader.count("device index")?;
        let device = devices
            .get(device_index)
            .ok_or_else(|| FusionError::UnknownDevice(format!("index {device_index} at offset {offset}")))?;

        let hand_count = reader.count("hand count")?;
        let mut hands = Vec::with_capacity(hand_count.min(2));
        for _ in 0..hand_count {
            hands.push(reader.hand()?);
        }
        frames.push(DeviceFrame::new(device.id.clone(), hands));
    }

    if reader.offset != data.len() {
        return Err(reader.error(format!("{} trailing values", data.len() - reader.offset)));
    }
    Ok(frames)
}

struct FrameReader<'a> {
    data: &'a [f32],
    offset: usize,
}

impl<'a> FrameReader<'a> {
    fn new(data: &'a [f32]) -> Self {
        Self { data, offset: 0 }
    }

    fn error(&self, reason: impl Into<String>) -> FusionError {
        FusionError::FrameBuffer {
            offset: self.offset,
            reason: reason.into(),
        }
    }

    fn take<const N: usize>(&mut self) -> Result<[f32; N]> {
        let end = self.offset + N;
        let values: [f32; N] = self
            .data
            .get(self.offset..end)
            .and_then(|slice| <[f32; N]>::try_from(slice).ok())
            .ok_or_else(|| self.error(format!("expected {N} values, buffer ends at {}", self.data.len())))?;
        if values.iter().any(|v| !v.is_finite()) {
            return Err(self.error("non-finite value"));
        }
        self.offset = end;
        Ok(values)
    }

    fn count(&mut self, what: &str) -> Result<usize> {
        let [value] = self.take::<1>()?;
        if value < 0.0 || value.fract() != 0.0 {
            self.offset -= 1;
            return Err(self.error(format!("{what} must be a non-negative integer, got {value}")));
        }
        Ok(value as usize)
    }

    fn vector(&mut self) -> Result<Vector3<f32>> {
        let [x, y, z] = self.take::<3>()?;
        Ok(Vector3::new(x, y, z))
    }

    fn rotation(&mut self) -> Result<UnitQuaternion<f32>> {
        let [x, y, z, w] = self.take::<4>()?;
        let q = Quaternion::new(w, x, y, z);
        if q.norm() <= f32::EPSILON {
            self.offset -= 4;
            return Err(self.error("zero-length rotation quaternion"));
        }
        Ok(UnitQuaternion::from_quaternion(q))
    }

    fn side(&mut self) -> Result<HandSide> {
        let [code] = self.take::<1>()?;
        match code {
            c if c == 0.0 => Ok(HandSide::Left),
            c if c == 1.0 => Ok(HandSide::Right),
            c => {
                self.offset -= 1;
                Err(self.error(format!("hand side must be 0 or 1, got {c}")))
            }
        }
    }

    fn hand(&mut self) -> Result<Hand> {
        let side = self.side()?;
        let palm = Palm {
            position: self.vector()?,
            orientation: self.rotation()?,
            normal: self.vector()?,
        };

        let mut digits = [Digit::default(); DIGIT_COUNT];
        for digit in digits.iter_mut() {
            for bone in digit.bones.iter_mut() {
                *bone = Bone {
                    prev_joint: self.vector()?,
                    next_joint: self.vector()?,
                    rotation: self.rotation()?,
                };
            }
        }
        Ok(Hand::new(side, palm, digits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeviceType, MergedHand};
    use approx::assert_relative_eq;
    use nalgebra::Isometry3;

    fn devices() -> Vec<Device> {
        vec![
            Device::new("left-rig", DeviceType::Rigel, Isometry3::identity()),
            Device::new("right-rig", DeviceType::Sir170, Isometry3::identity()),
        ]
    }

    /// Hand record with identity rotations and joints laid along +x
    fn hand_values(side: f32, palm: [f32; 3]) -> Vec<f32> {
        let mut values = vec![side];
        values.extend_from_slice(&palm);
        values.extend_from_slice(&[0.0, 0.0, 0.0, 1.0]);
        values.extend_from_slice(&[0.0, 0.0, -1.0]);
        for digit in 0..DIGIT_COUNT {
            for bone in 0..BONES_PER_DIGIT {
                let y = digit as f32 * 0.02;
                values.extend_from_slice(&[bone as f32 * 0.03, y, 0.0]);
                values.extend_from_slice(&[(bone + 1) as f32 * 0.03, y, 0.0]);
                values.extend_from_slice(&[0.0, 0.0, 0.0, 1.0]);
            }
        }
        values
    }

    #[test]
    fn test_hand_stride_matches_record() {
        assert_eq!(hand_values(0.0, [0.0; 3]).len(), HAND_STRIDE);
    }

    #[test]
    fn test_decode_two_frames() {
        let mut data = vec![2.0];
        data.extend_from_slice(&[1.0, 2.0]);
        data.extend(hand_values(0.0, [0.1, 0.2, 0.3]));
        data.extend(hand_values(1.0, [0.4, 0.5, 0.6]));
        data.extend_from_slice(&[0.0, 0.0]);

        let frames = decode_device_frames(&data, &devices()).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].device.as_str(), "right-rig");
        assert_eq!(frames[0].hands.len(), 2);
        assert_eq!(frames[0].hands[1].side, HandSide::Right);
        assert_eq!(frames[0].hands[0].palm.position, Vector3::new(0.1, 0.2, 0.3));
        assert_relative_eq!(frames[0].hands[0].digits[2].bones[3].next_joint, Vector3::new(0.12, 0.04, 0.0));
        assert!(frames[1].hands.is_empty());
    }

    #[test]
    fn test_decode_rejects_truncated_buffer() {
        let mut data = vec![1.0, 0.0, 1.0];
        data.extend(hand_values(0.0, [0.0; 3]));
        data.truncate(data.len() - 2);

        assert!(matches!(
            decode_device_frames(&data, &devices()),
            Err(FusionError::FrameBuffer { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_fields() {
        // device index out of range
        assert!(matches!(
            decode_device_frames(&[1.0, 5.0, 0.0], &devices()),
            Err(FusionError::UnknownDevice(_))
        ));
        // fractional count
        assert!(matches!(
            decode_device_frames(&[1.5], &devices()),
            Err(FusionError::FrameBuffer { offset: 0, .. })
        ));
        // trailing values
        assert!(matches!(
            decode_device_frames(&[0.0, 7.0], &devices()),
            Err(FusionError::FrameBuffer { offset: 1, .. })
        ));

        let mut bad_side = vec![1.0, 0.0, 1.0];
        bad_side.extend(hand_values(2.0, [0.0; 3]));
        assert!(matches!(
            decode_device_frames(&bad_side, &devices()),
            Err(FusionError::FrameBuffer { offset: 3, .. })
        ));

        let mut zero_quat = vec![1.0, 0.0, 1.0];
        zero_quat.extend(hand_values(0.0, [0.0; 3]));
        zero_quat[3 + 4..3 + 8].copy_from_slice(&[0.0; 4]);
        assert!(matches!(
            decode_device_frames(&zero_quat, &devices()),
            Err(FusionError::FrameBuffer { offset: 7, .. })
        ));
    }

    #[test]
    fn test_empty_tick_decodes() {
        assert!(decode_device_frames(&[0.0], &devices()).unwrap().is_empty());
        assert!(decode_device_frames(&[], &devices()).is_err());
    }

    #[test]
    fn test_encode_layout() {
        let joints = std::array::from_fn(|i| Vector3::new(i as f32, 0.0, -(i as f32)));
        let hand = MergedHand {
            side: HandSide::Right,
            palm: Palm {
                position: Vector3::new(1.0, 2.0, 3.0),
                orientation: UnitQuaternion::identity(),
                normal: Vector3::new(0.0, -1.0, 0.0),
            },
            joints,
            contributors: 2,
        };
        let out = encode_merged_frame(&MergedFrame::new(vec![hand]));

        assert_eq!(out.len(), 1 + MERGED_HAND_STRIDE);
        assert_eq!(out[0], 1.0);
        assert_eq!(out[1], 1.0);
        assert_eq!(&out[2..5], &[1.0, 2.0, 3.0]);
        assert_eq!(&out[5..9], &[0.0, 0.0, 0.0, 1.0]);
        assert_eq!(&out[9..12], &[0.0, -1.0, 0.0]);
        // last joint
        assert_eq!(&out[out.len() - 3..], &[24.0, 0.0, -24.0]);

        assert_eq!(encode_merged_frame(&MergedFrame::default()), vec![0.0]);
    }
}
