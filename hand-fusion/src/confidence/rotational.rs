//! Rotational confidence from surface normals
//!
//! A hand seen face-on (or back-on) is tracked far better than one seen
//! edge-on, where the fingers occlude each other.

use nalgebra::Vector3;

use crate::model::{Device, Palm};

/// Angle between two vectors in radians, None if either is degenerate
pub fn angle_between(a: &Vector3<f32>, b: &Vector3<f32>) -> Option<f32> {
    let lengths = a.norm() * b.norm();
    if lengths <= f32::EPSILON {
        return None;
    }
    Some((a.dot(b) / lengths).clamp(-1.0, 1.0).acos())
}

/// 1 at 0° and 180°, 0 at 90°
pub fn facing_confidence(angle: f32) -> f32 {
    ((2.0 * angle).cos() + 1.0) / 2.0
}

/// 1 at 0°, 0.5 at 90°, 0 at 180°
pub fn alignment_confidence(angle: f32) -> f32 {
    (angle.cos() + 1.0) / 2.0
}

/// Palm normal against the direction from the palm to the device
pub fn palm_rotation_confidence(device: &Device, palm: &Palm) -> f32 {
    let to_device = device.origin.translation.vector - palm.position;
    angle_between(&palm.normal, &to_device).map_or(0.0, facing_confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeviceType;
    use approx::assert_relative_eq;
    use nalgebra::Isometry3;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_facing_extremes() {
        assert_relative_eq!(facing_confidence(0.0), 1.0);
        assert_relative_eq!(facing_confidence(PI), 1.0, epsilon = 1e-6);
        assert_relative_eq!(facing_confidence(FRAC_PI_2), 0.0, epsilon = 1e-6);
        assert_relative_eq!(facing_confidence(FRAC_PI_4), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_alignment_extremes() {
        assert_relative_eq!(alignment_confidence(0.0), 1.0);
        assert_relative_eq!(alignment_confidence(FRAC_PI_2), 0.5, epsilon = 1e-6);
        assert_relative_eq!(alignment_confidence(PI), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_vector_has_no_angle() {
        assert!(angle_between(&Vector3::zeros(), &Vector3::x()).is_none());
        assert_relative_eq!(angle_between(&Vector3::x(), &Vector3::y()).unwrap(), FRAC_PI_2);
    }

    #[test]
    fn test_palm_facing_device() {
        let device = Device::new("d", DeviceType::Rigel, Isometry3::identity());
        let towards = Palm {
            position: Vector3::new(0.3, 0.0, 0.0),
            normal: -Vector3::x(),
            ..Palm::default()
        };
        let edge_on = Palm {
            normal: Vector3::z(),
            ..towards
        };
        assert_relative_eq!(palm_rotation_confidence(&device, &towards), 1.0);
        assert_relative_eq!(palm_rotation_confidence(&device, &edge_on), 0.0, epsilon = 1e-6);
    }

    proptest! {
        #[test]
        fn prop_facing_symmetric_about_right_angle(offset in 0.0f32..FRAC_PI_2) {
            let below = facing_confidence(FRAC_PI_2 - offset);
            let above = facing_confidence(FRAC_PI_2 + offset);
            prop_assert!((below - above).abs() < 1e-5);
            prop_assert!((-1e-6..=1.0 + 1e-6).contains(&below));
        }
    }
}
