//! Fusion configuration
//!
//! Loaded from TOML, validated once, and safe to swap at runtime through
//! `FusionEngine::set_config`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FusionError, Result};
use crate::model::{Device, DeviceDescriptor};

/// Weight of each confidence sub-score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    /// Hand position inside the device's field of view
    pub palm_position: f32,
    /// Palm normal relative to the device direction
    pub palm_rotation: f32,
    /// Low hand speed
    pub palm_velocity: f32,
    /// Joint normal relative to the device direction
    pub joint_rotation: f32,
    /// Joint normal relative to the palm normal
    pub joint_rotation_to_palm: f32,
    /// Visible pixel ratio from an occlusion source, ignored when 0
    pub joint_occlusion: f32,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            palm_position: 0.4,
            palm_rotation: 0.3,
            palm_velocity: 0.3,
            joint_rotation: 0.5,
            joint_rotation_to_palm: 0.5,
            joint_occlusion: 0.0,
        }
    }
}

impl ConfidenceWeights {
    fn named(&self) -> [(&'static str, f32); 6] {
        [
            ("palm_position", self.palm_position),
            ("palm_rotation", self.palm_rotation),
            ("palm_velocity", self.palm_velocity),
            ("joint_rotation", self.joint_rotation),
            ("joint_rotation_to_palm", self.joint_rotation_to_palm),
            ("joint_occlusion", self.joint_occlusion),
        ]
    }

    pub fn hand_sum(&self) -> f32 {
        self.palm_position + self.palm_rotation + self.palm_velocity
    }

    pub fn joint_sum(&self) -> f32 {
        self.joint_rotation + self.joint_rotation_to_palm + self.joint_occlusion
    }
}

/// Window sizes of the per (device, side) history stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub positions: usize,
    pub hand_confidence: usize,
    pub joint_confidence: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            positions: 10,
            hand_confidence: 60,
            joint_confidence: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub weights: ConfidenceWeights,
    /// Distrust a hand during its first seconds of continuous visibility
    pub ignore_recent_new_hands: bool,
    /// Length of the new-hand ramp (seconds)
    pub new_hand_ramp_seconds: f64,
    /// Speed (units/s) at which velocity confidence reaches 0
    pub velocity_cutoff: f32,
    /// Oldest position sample older than this many ticks counts as stale
    pub staleness_ticks: u32,
    /// Tick interval assumed before two ticks have been observed (seconds)
    pub nominal_tick_interval: f64,
    pub history: HistoryConfig,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            weights: ConfidenceWeights::default(),
            ignore_recent_new_hands: true,
            new_hand_ramp_seconds: 1.0,
            velocity_cutoff: 2.0,
            staleness_ticks: 10,
            nominal_tick_interval: 1.0 / 90.0,
            history: HistoryConfig::default(),
        }
    }
}

impl FusionConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: FusionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, weight) in self.weights.named() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(FusionError::InvalidConfig(format!(
                    "weight {name} must be finite and non-negative, got {weight}"
                )));
            }
        }

        if !(self.new_hand_ramp_seconds.is_finite() && self.new_hand_ramp_seconds > 0.0) {
            return Err(FusionError::InvalidConfig(format!(
                "new_hand_ramp_seconds must be positive, got {}",
                self.new_hand_ramp_seconds
            )));
        }
        if !(self.velocity_cutoff.is_finite() && self.velocity_cutoff > 0.0) {
            return Err(FusionError::InvalidConfig(format!(
                "velocity_cutoff must be positive, got {}",
                self.velocity_cutoff
            )));
        }
        if !(self.nominal_tick_interval.is_finite() && self.nominal_tick_interval > 0.0) {
            return Err(FusionError::InvalidConfig(format!(
                "nominal_tick_interval must be positive, got {}",
                self.nominal_tick_interval
            )));
        }
        if self.staleness_ticks == 0 {
            return Err(FusionError::InvalidConfig("staleness_ticks must be at least 1".into()));
        }

        let history = &self.history;
        if history.positions == 0 || history.hand_confidence == 0 || history.joint_confidence == 0 {
            return Err(FusionError::InvalidConfig(
                "history window sizes must be at least 1".into(),
            ));
        }

        // Not an error: confidences are relative, but they leave [0, 1]
        if self.weights.hand_sum() > 1.0 + 1e-4 {
            warn!(sum = self.weights.hand_sum(), "hand confidence weights sum above 1");
        }
        if self.weights.joint_sum() > 1.0 + 1e-4 {
            warn!(sum = self.weights.joint_sum(), "joint confidence weights sum above 1");
        }

        Ok(())
    }
}

/// A complete session description: fusion settings plus the device list
///
/// ```toml
/// [fusion]
/// ignore_recent_new_hands = false
///
/// [[devices]]
/// id = "LP-1"
/// device_type = "peripheral"
/// translation = [0.0, 0.0, 0.0]
/// rotation_degrees = [0.0, -90.0, 0.0]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusionSetup {
    #[serde(default)]
    pub fusion: FusionConfig,
    #[serde(default)]
    pub devices: Vec<DeviceDescriptor>,
}

impl FusionSetup {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let setup: FusionSetup = toml::from_str(content)?;
        setup.fusion.validate()?;
        Ok(setup)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn devices(&self) -> Vec<Device> {
        self.devices.iter().map(DeviceDescriptor::to_device).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeviceType;

    #[test]
    fn test_defaults_validate() {
        assert!(FusionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = FusionConfig::from_toml_str(
            r#"
            ignore_recent_new_hands = false

            [weights]
            palm_velocity = 0.0

            [history]
            positions = 5
            "#,
        )
        .unwrap();

        assert!(!config.ignore_recent_new_hands);
        assert_eq!(config.weights.palm_velocity, 0.0);
        assert_eq!(config.weights.palm_position, 0.4);
        assert_eq!(config.history.positions, 5);
        assert_eq!(config.history.hand_confidence, 60);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = FusionConfig::default();
        config.weights.joint_rotation = -0.1;
        assert!(matches!(config.validate(), Err(FusionError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_window_rejected() {
        let result = FusionConfig::from_toml_str("[history]\njoint_confidence = 0\n");
        assert!(matches!(result, Err(FusionError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let result = FusionConfig::from_toml_str("weights = 3");
        assert!(matches!(result, Err(FusionError::ConfigParse(_))));
    }

    #[test]
    fn test_setup_reads_devices() {
        let setup = FusionSetup::from_toml_str(
            r#"
            [fusion]
            velocity_cutoff = 3.0

            [[devices]]
            id = "LP-1"
            device_type = "peripheral"

            [[devices]]
            id = "SIR-2"
            device_type = "sir170"
            translation = [0.5, 0.0, 0.0]
            "#,
        )
        .unwrap();

        assert_eq!(setup.fusion.velocity_cutoff, 3.0);
        let devices = setup.devices();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[1].device_type, DeviceType::Sir170);
        assert_eq!(devices[1].origin.translation.vector.x, 0.5);
    }
}
