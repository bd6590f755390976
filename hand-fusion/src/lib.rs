//! Hand Fusion - multi-device hand tracking fusion
//!
//! Merges per-device hand observations into one hand per side, weighting
//! each device by how well it can see the hand.
//!
//! Entry point for the library and the WASM module. Only contains:
//! - Module declarations and public re-exports
//! - the wasm_bindgen start hook

pub mod bridge;
pub mod confidence;
pub mod config;
pub mod error;
pub mod fusion;
pub mod history;
pub mod model;

use wasm_bindgen::prelude::*;

pub use config::{ConfidenceWeights, FusionConfig, FusionSetup, HistoryConfig};
pub use confidence::{ConfidenceEstimator, JointOcclusion, PixelCount, TickClock};
pub use error::{FusionError, Result};
pub use fusion::{FrameMerger, FusionEngine};
pub use model::{
    Device, DeviceDescriptor, DeviceFrame, DeviceId, DeviceType, Hand, HandSide, MergedFrame,
    MergedHand,
};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
