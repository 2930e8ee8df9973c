//! Debounced wall confirmation.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::DirectionalReading;

/// Walls that have passed the dwell test, robot-relative.
///
/// There is no back field: the rear sensor never confirms a wall.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConfirmedWalls {
    pub front: bool,
    pub left: bool,
    pub right: bool,
}

/// Dwell state for one direction.
#[derive(Clone, Copy, Debug, Default)]
struct Dwell {
    since: Option<Instant>,
    confirmed: bool,
}

impl Dwell {
    fn update(&mut self, distance: f32, threshold: f32, dwell: Duration, now: Instant) -> bool {
        if distance < threshold {
            let since = *self.since.get_or_insert(now);
            if now.saturating_duration_since(since) >= dwell {
                self.confirmed = true;
            }
        } else {
            // No hysteresis: one sample above threshold restarts the dwell
            self.since = None;
            self.confirmed = false;
        }
        self.confirmed
    }
}

/// Per-direction debounce over smoothed distances.
///
/// A wall is confirmed once its smoothed distance has stayed below
/// `threshold` for at least `dwell`.
#[derive(Clone, Debug)]
pub struct WallConfirmationTracker {
    threshold: f32,
    dwell: Duration,
    front: Dwell,
    left: Dwell,
    right: Dwell,
}

impl WallConfirmationTracker {
    /// Create a tracker with no walls confirmed.
    pub fn new(threshold_mm: f32, dwell: Duration) -> Self {
        Self {
            threshold: threshold_mm,
            dwell,
            front: Dwell::default(),
            left: Dwell::default(),
            right: Dwell::default(),
        }
    }

    /// Distance below which a wall is suspected.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Feed the latest smoothed distances sampled at `now`.
    pub fn update(&mut self, reading: &DirectionalReading, now: Instant) -> ConfirmedWalls {
        let (threshold, dwell) = (self.threshold, self.dwell);
        ConfirmedWalls {
            front: self.front.update(reading.front, threshold, dwell, now),
            left: self.left.update(reading.left, threshold, dwell, now),
            right: self.right.update(reading.right, threshold, dwell, now),
        }
    }

    /// Confirmation state as of the last update.
    pub fn confirmed(&self) -> ConfirmedWalls {
        ConfirmedWalls {
            front: self.front.confirmed,
            left: self.left.confirmed,
            right: self.right.confirmed,
        }
    }
}
