//! Exponential smoothing of directional range readings.

use serde::{Deserialize, Serialize};

/// One raw range frame as received from the robot, in millimetres.
///
/// Any direction may be missing from a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeFrame {
    #[serde(rename = "F", default)]
    pub front: Option<f32>,
    #[serde(rename = "L", default)]
    pub left: Option<f32>,
    #[serde(rename = "R", default)]
    pub right: Option<f32>,
    #[serde(rename = "B", default)]
    pub back: Option<f32>,
}

/// Distances in the four robot-relative directions, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionalReading {
    pub front: f32,
    pub left: f32,
    pub right: f32,
    pub back: f32,
}

impl DirectionalReading {
    /// Same distance in every direction.
    pub fn uniform(distance: f32) -> Self {
        Self {
            front: distance,
            left: distance,
            right: distance,
            back: distance,
        }
    }
}

/// Operator calibration added to the side sensors before smoothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOffsets {
    pub left_mm: f32,
    pub right_mm: f32,
}

/// Per-direction exponential smoother.
///
/// `smoothed = smoothed * (1 - alpha) + raw * alpha`, independently for each
/// direction. Missing readings count as `far_distance` so a gap in the data
/// never looks like a nearby wall.
#[derive(Clone, Debug)]
pub struct SensorFusion {
    alpha: f32,
    far_distance: f32,
    smoothed: DirectionalReading,
}

impl SensorFusion {
    /// Create a smoother starting at `far_distance` in every direction.
    pub fn new(alpha: f32, far_distance: f32) -> Self {
        Self {
            alpha,
            far_distance,
            smoothed: DirectionalReading::uniform(far_distance),
        }
    }

    /// Current smoothed distances.
    pub fn smoothed(&self) -> DirectionalReading {
        self.smoothed
    }

    /// Fold one frame into the smoothed state.
    pub fn update(&mut self, raw: &RangeFrame, offsets: CalibrationOffsets) -> DirectionalReading {
        let far = self.far_distance;
        let resolve = |value: Option<f32>| match value {
            Some(v) if v.is_finite() => v.max(0.0),
            _ => far,
        };

        let front = resolve(raw.front);
        let left = (resolve(raw.left) + offsets.left_mm).max(0.0);
        let right = (resolve(raw.right) + offsets.right_mm).max(0.0);
        let back = resolve(raw.back);

        let a = self.alpha;
        let blend = |prev: f32, new: f32| prev * (1.0 - a) + new * a;

        self.smoothed = DirectionalReading {
            front: blend(self.smoothed.front, front),
            left: blend(self.smoothed.left, left),
            right: blend(self.smoothed.right, right),
            back: blend(self.smoothed.back, back),
        };
        self.smoothed
    }
}
