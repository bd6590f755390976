//! Positional confidence - where the hand sits in the device frustum
//!
//! The hand position is moved into the device frame and scored with a 2D
//! Gaussian across the image plane, centred on the optic axis. The spread
//! grows with depth so the Gaussian roughly covers the field of view, and
//! the amplitude is 1 inside the device's ideal depth band with arctangent
//! tails on both sides.

use std::f32::consts::FRAC_PI_2;

use nalgebra::{Point3, Vector3};

use crate::model::{Device, DeviceProfile};

/// Peak of the arctangent tails, scaled so the tail spans roughly [-0.05, 1.05]
const TAIL_GAIN: f32 = 0.55 / FRAC_PI_2;

/// Near-side tail: steep rise just in front of the sensor
const NEAR_TAIL_SLOPE: f32 = 100.0;
const NEAR_TAIL_OFFSET: f32 = 0.05;

/// Far-side tail: gentler fall-off past the ideal band
const FAR_TAIL_SLOPE: f32 = 50.0;

/// Fraction of the visible width covered by one sigma
const SIGMA_WIDTH_FACTOR: f32 = 0.2;

/// Closer than this the Gaussian spread collapses
const MIN_DEPTH: f32 = 1e-4;

/// Amplitude of the Gaussian at `depth` for a device profile
///
/// 1 inside `[ideal_near, ideal_far]`, then arctangent-shaped towards 0 on
/// either side. Clamped to [0, 1].
pub fn depth_amplitude(profile: &DeviceProfile, depth: f32) -> f32 {
    let amplitude = if depth < profile.ideal_near {
        TAIL_GAIN * (NEAR_TAIL_SLOPE * (depth + NEAR_TAIL_OFFSET)).atan() + 0.5
    } else if depth > profile.ideal_far {
        -TAIL_GAIN * (FAR_TAIL_SLOPE * (depth - profile.far_falloff_center)).atan() + 0.5
    } else {
        1.0
    };
    amplitude.clamp(0.0, 1.0)
}

/// Gaussian spread along one lateral axis at `depth`
///
/// Half the depth over sin(fov / 2) is the width the sensor can see there.
fn lateral_sigma(depth: f32, fov_degrees: f32) -> f32 {
    let visible_width = (depth / 2.0) / (fov_degrees / 2.0).to_radians().sin();
    SIGMA_WIDTH_FACTOR * visible_width
}

/// Confidence in [0, 1] from the hand position relative to a device
///
/// Hands on or behind the sensor plane score 0.
pub fn positional_confidence(device: &Device, position: &Vector3<f32>) -> f32 {
    let local = device.origin.inverse_transform_point(&Point3::from(*position));
    let depth = local.x;
    if depth <= MIN_DEPTH {
        return 0.0;
    }

    let (amplitude, sigma_y, sigma_z) = match device.device_type.profile() {
        Some(profile) => (
            depth_amplitude(&profile, depth),
            lateral_sigma(depth, profile.fov_y_degrees),
            lateral_sigma(depth, profile.fov_z_degrees),
        ),
        // No published model: fade linearly with depth, spread equal to depth
        None => ((1.0 - depth).clamp(0.0, 1.0), depth, depth),
    };

    let exponent = local.y.powi(2) / (2.0 * sigma_y.powi(2)) + local.z.powi(2) / (2.0 * sigma_z.powi(2));
    (amplitude * (-exponent).exp()).clamp(0.0, 1.0)
}
