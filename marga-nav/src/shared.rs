//! Shared state between the ingest and navigation threads.
//!
//! Sensor frames, yaw and grid position arrive on the ingest thread and are
//! merged under a single lock. The navigation thread copies a
//! [`SensorSnapshot`] out at the start of each tick and releases the lock
//! before publishing anything.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use marga_map::GridCoord;
use parking_lot::Mutex;
use serde::Serialize;

use crate::config::SensingConfig;
use crate::control::ControllerStatus;
use crate::sensing::{CalibrationOffsets, DirectionalReading, RangeFrame, SensorFusion};
use crate::utils::wrap_degrees;

/// Verification state reported by the external position tracker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum TrackerTag {
    #[default]
    Normal,
    Check,
    Stop,
}

impl TrackerTag {
    /// Map the tracker's state label. Unrecognised labels are `Normal`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "STOP" => TrackerTag::Stop,
            "CHECK" => TrackerTag::Check,
            _ => TrackerTag::Normal,
        }
    }

    /// Whether the tracker asks the robot to halt and verify.
    pub fn is_alert(self) -> bool {
        self != TrackerTag::Normal
    }
}

/// Everything the decision loop reads from the sensors in one tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SensorSnapshot {
    /// Smoothed distances
    pub readings: DirectionalReading,
    /// Raw yaw in degrees, [0, 360)
    pub yaw: f32,
    pub cell: GridCoord,
    pub tracker: TrackerTag,
}

/// Sensor and pose state guarded by one lock.
#[derive(Debug)]
pub struct SensorState {
    fusion: SensorFusion,
    offsets: CalibrationOffsets,
    yaw: f32,
    cell: GridCoord,
    tracker: TrackerTag,
}

impl SensorState {
    fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            readings: self.fusion.smoothed(),
            yaw: self.yaw,
            cell: self.cell,
            tracker: self.tracker,
        }
    }
}

/// State shared by all threads.
#[derive(Debug)]
pub struct SharedNavigationState {
    sensors: Mutex<SensorState>,

    /// Latest controller diagnostics (written by the navigation thread)
    diagnostics: Mutex<Option<ControllerStatus>>,

    /// Shutdown signal for graceful termination
    shutdown: AtomicBool,

    /// Number of range frames merged (for status reporting)
    range_frames: AtomicU64,
}

impl SharedNavigationState {
    /// Create shared state with far readings, yaw 0 and the robot at (0, 0).
    pub fn new(config: &SensingConfig) -> Self {
        Self {
            sensors: Mutex::new(SensorState {
                fusion: SensorFusion::new(config.smoothing_alpha, config.far_distance_mm),
                offsets: CalibrationOffsets::default(),
                yaw: 0.0,
                cell: GridCoord::new(0, 0),
                tracker: TrackerTag::Normal,
            }),
            diagnostics: Mutex::new(None),
            shutdown: AtomicBool::new(false),
            range_frames: AtomicU64::new(0),
        }
    }

    /// Merge a range frame through the smoother.
    pub fn apply_range(&self, frame: &RangeFrame) {
        {
            let mut s = self.sensors.lock();
            let offsets = s.offsets;
            s.fusion.update(frame, offsets);
        }
        self.range_frames.fetch_add(1, Ordering::Relaxed);
    }

    /// Store a new yaw (degrees).
    pub fn apply_yaw(&self, yaw: f32) {
        if yaw.is_finite() {
            self.sensors.lock().yaw = wrap_degrees(yaw);
        }
    }

    /// Store a new grid position. A missing axis keeps its previous value.
    pub fn apply_position(&self, x: Option<i32>, y: Option<i32>) {
        let mut s = self.sensors.lock();
        if let Some(x) = x {
            s.cell.x = x;
        }
        if let Some(y) = y {
            s.cell.y = y;
        }
    }

    /// Store the tracker's verification state.
    pub fn apply_tracker(&self, tag: TrackerTag) {
        self.sensors.lock().tracker = tag;
    }

    /// Shift the side calibration offsets; returns the new offsets.
    pub fn adjust_calibration(&self, left_mm: f32, right_mm: f32) -> CalibrationOffsets {
        let mut s = self.sensors.lock();
        s.offsets.left_mm += left_mm;
        s.offsets.right_mm += right_mm;
        s.offsets
    }

    /// Current calibration offsets.
    pub fn calibration(&self) -> CalibrationOffsets {
        self.sensors.lock().offsets
    }

    /// Copy out everything the decision loop needs.
    pub fn snapshot(&self) -> SensorSnapshot {
        self.sensors.lock().snapshot()
    }

    /// Publish controller diagnostics for display.
    pub fn publish_status(&self, status: ControllerStatus) {
        *self.diagnostics.lock() = Some(status);
    }

    /// Last published diagnostics.
    pub fn status(&self) -> Option<ControllerStatus> {
        self.diagnostics.lock().clone()
    }

    /// Number of range frames merged so far.
    pub fn range_frames(&self) -> u64 {
        self.range_frames.load(Ordering::Relaxed)
    }

    /// Signal shutdown.
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Check if shutdown is signaled.
    pub fn should_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}
