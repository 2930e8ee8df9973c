//! Range sensor processing.
//!
//! - [`SensorFusion`]: calibration offsets plus per-direction exponential
//!   smoothing of the four range sensors
//! - [`WallConfirmationTracker`]: dwell-time debounce turning smoothed
//!   distances into confirmed walls

mod fusion;
mod walls;

pub use fusion::{CalibrationOffsets, DirectionalReading, RangeFrame, SensorFusion};
pub use walls::{ConfirmedWalls, WallConfirmationTracker};
