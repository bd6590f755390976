//! Tracking device descriptors
//!
//! A device is registered once per fusion session and never changes.
//! Its origin places the sensor in shared space; the sensor looks along
//! its local +X axis, with local Y and Z spanning the image plane.

use std::fmt;

use nalgebra::{Isometry3, Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};

/// Stable identity of a tracking device (usually its serial number)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ============================================================================
// DEVICE TYPES
// ============================================================================

/// Hardware family, selects the field-of-view and depth model
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Peripheral,
    Rigel,
    Sir170,
    ThreeDi,
    Unknown,
}

/// Field of view and preferred working depth of a device family
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceProfile {
    /// Opening angle along local Y (degrees)
    pub fov_y_degrees: f32,
    /// Opening angle along local Z (degrees)
    pub fov_z_degrees: f32,
    /// Depth band where tracking is at its best (meters)
    pub ideal_near: f32,
    pub ideal_far: f32,
    /// Depth at which the far-side amplitude has dropped to one half
    pub far_falloff_center: f32,
}

/// 170 x 170 degrees, 10cm to 75cm preferred, up to 1m
const WIDE_FOV_PROFILE: DeviceProfile = DeviceProfile {
    fov_y_degrees: 170.0,
    fov_z_degrees: 170.0,
    ideal_near: 0.1,
    ideal_far: 0.75,
    far_falloff_center: 0.875,
};

/// 140 x 120 degrees, 10cm to 60cm preferred, up to 80cm
const PERIPHERAL_PROFILE: DeviceProfile = DeviceProfile {
    fov_y_degrees: 120.0,
    fov_z_degrees: 140.0,
    ideal_near: 0.1,
    ideal_far: 0.6,
    far_falloff_center: 0.7,
};

impl DeviceType {
    /// Returns None for device families without a published model
    pub fn profile(self) -> Option<DeviceProfile> {
        match self {
            DeviceType::Rigel | DeviceType::Sir170 | DeviceType::ThreeDi => Some(WIDE_FOV_PROFILE),
            DeviceType::Peripheral => Some(PERIPHERAL_PROFILE),
            DeviceType::Unknown => None,
        }
    }
}

// ============================================================================
// DEVICE
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Device {
    pub id: DeviceId,
    pub device_type: DeviceType,
    /// Sensor pose in shared space
    pub origin: Isometry3<f32>,
}

impl Device {
    pub fn new(id: impl Into<DeviceId>, device_type: DeviceType, origin: Isometry3<f32>) -> Self {
        Self {
            id: id.into(),
            device_type,
            origin,
        }
    }
}

/// Serializable form of [`Device`] used in configuration files
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub id: DeviceId,
    pub device_type: DeviceType,
    #[serde(default)]
    pub translation: [f32; 3],
    /// Roll, pitch, yaw in degrees
    #[serde(default)]
    pub rotation_degrees: [f32; 3],
}

impl DeviceDescriptor {
    pub fn to_device(&self) -> Device {
        let [x, y, z] = self.translation;
        let [roll, pitch, yaw] = self.rotation_degrees;
        let rotation = UnitQuaternion::from_euler_angles(
            roll.to_radians(),
            pitch.to_radians(),
            yaw.to_radians(),
        );
        Device::new(
            self.id.clone(),
            self.device_type,
            Isometry3::from_parts(Translation3::new(x, y, z), rotation),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_unknown_type_has_no_profile() {
        assert!(DeviceType::Unknown.profile().is_none());
        assert_eq!(DeviceType::Sir170.profile(), DeviceType::Rigel.profile());
    }

    #[test]
    fn test_descriptor_builds_origin() {
        let descriptor = DeviceDescriptor {
            id: "LP-1".into(),
            device_type: DeviceType::Peripheral,
            translation: [0.0, 0.0, 1.0],
            rotation_degrees: [0.0, 0.0, 90.0],
        };
        let device = descriptor.to_device();

        // device +X points along world +Y after a 90° yaw
        let ahead = device.origin.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(ahead, Point3::new(0.0, 1.0, 1.0), epsilon = 1e-5);
        assert_eq!(device.id.as_str(), "LP-1");
    }
}
