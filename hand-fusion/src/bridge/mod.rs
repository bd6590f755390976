//! Bridge module - host ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod frames;
mod session;

pub use frames::{
    decode_device_frames, encode_merged_frame, BONE_STRIDE, HAND_STRIDE, MERGED_HAND_STRIDE,
};

pub use session::{
    // WASM entry points
    close_fusion,
    configure_fusion,
    fuse_tick,
    reset_fusion,
    // Internal API
    build_engine,
    fuse_buffer,
    is_fusion_configured,
};
