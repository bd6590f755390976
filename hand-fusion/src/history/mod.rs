//! History module - bounded per-device sample stores
//!
//! Re-exports only. All logic in submodules.

mod buffer;
mod position;
mod side;

pub use buffer::{HistoryBuffer, Sample};
pub use position::{PositionHistory, PositionSample};
pub use side::{DeviceHistory, SideHistory};
