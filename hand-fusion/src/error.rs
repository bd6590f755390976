//! Error types for engine construction, configuration and the host bridge
//!
//! A fusion tick itself never fails; these only surface at the edges.

use thiserror::Error;

use crate::model::DeviceId;

pub type Result<T> = std::result::Result<T, FusionError>;

#[derive(Debug, Error)]
pub enum FusionError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("fusion engine needs at least one device")]
    NoDevices,

    #[error("device {0} registered more than once")]
    DuplicateDevice(DeviceId),

    #[error("frame references unregistered device {0}")]
    UnknownDevice(String),

    #[error("malformed frame buffer at offset {offset}: {reason}")]
    FrameBuffer { offset: usize, reason: String },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}
