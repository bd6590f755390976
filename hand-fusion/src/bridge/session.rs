//! Fusion session and JS bridge
//!
//! Holds one `FusionEngine` for a single-threaded host. The host configures
//! it from a TOML document, then hands over one flat buffer of device frames
//! per tick and reads back the merged hands.

use std::cell::RefCell;

use tracing::{error, info};
use wasm_bindgen::prelude::*;

use crate::config::FusionSetup;
use crate::error::Result;
use crate::fusion::FusionEngine;

use super::frames::{decode_device_frames, encode_merged_frame};

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static SESSION: RefCell<Option<FusionEngine>> = RefCell::new(None);
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Build (or rebuild) the fusion engine from a TOML setup with `[[devices]]`
///
/// Returns false and keeps the previous engine if the setup is invalid.
#[wasm_bindgen]
pub fn configure_fusion(setup_toml: &str) -> bool {
    match build_engine(setup_toml) {
        Ok(engine) => {
            SESSION.with(|session| *session.borrow_mut() = Some(engine));
            true
        }
        Err(err) => {
            error!(%err, "fusion setup rejected");
            false
        }
    }
}

/// Fuse one tick of device frames, returning the encoded merged frame
///
/// Returns an empty buffer when no engine is configured or the input is
/// malformed.
#[wasm_bindgen]
pub fn fuse_tick(frames: &[f32], now: f64) -> Vec<f32> {
    SESSION.with(|session| {
        let mut session = session.borrow_mut();
        let Some(engine) = session.as_mut() else {
            error!("fuse_tick called before configure_fusion");
            return Vec::new();
        };
        match fuse_buffer(engine, frames, now) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(%err, "dropping malformed frame buffer");
                Vec::new()
            }
        }
    })
}

/// Clear all fusion history, keeping the configured devices
#[wasm_bindgen]
pub fn reset_fusion() {
    SESSION.with(|session| {
        if let Some(engine) = session.borrow_mut().as_mut() {
            engine.reset();
        }
    });
}

/// Drop the configured engine entirely
#[wasm_bindgen]
pub fn close_fusion() {
    SESSION.with(|session| session.borrow_mut().take());
    info!("fusion session closed");
}

// ============================================================================
// INTERNAL API (no wasm_bindgen)
// ============================================================================

/// Whether `configure_fusion` has succeeded since the last close
pub fn is_fusion_configured() -> bool {
    SESSION.with(|session| session.borrow().is_some())
}

pub fn build_engine(setup_toml: &str) -> Result<FusionEngine> {
    let setup = FusionSetup::from_toml_str(setup_toml)?;
    FusionEngine::from_setup(&setup)
}

/// Decode, fuse and encode one tick against `engine`
pub fn fuse_buffer(engine: &mut FusionEngine, frames: &[f32], now: f64) -> Result<Vec<f32>> {
    let decoded = decode_device_frames(frames, engine.devices())?;
    let merged = engine.fuse(&decoded, now);
    Ok(encode_merged_frame(&merged))
}
