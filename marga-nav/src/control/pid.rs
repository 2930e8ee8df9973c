//! Proportional-integral-derivative controller.
//!
//! Two independent instances run in the navigation loop: heading hold
//! (operator-tunable gains) and lateral centering between side walls (fixed
//! gains). A controller has no reset; changing gains means building a new
//! one.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::{HeadingPidConfig, PidConfig};

/// Smallest `dt` used, in seconds, so back-to-back calls stay bounded.
pub const MIN_DT_SECS: f32 = 0.001;

/// PID gains and symmetric output clamp.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub max_output: f32,
}

impl From<PidConfig> for PidGains {
    fn from(c: PidConfig) -> Self {
        Self {
            kp: c.kp,
            ki: c.ki,
            kd: c.kd,
            max_output: c.max_output,
        }
    }
}

/// Operator-tunable heading-hold gains.
///
/// Serialized with the field names the robot's tune message expects.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeadingGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Deadband in degrees
    #[serde(rename = "db")]
    pub deadband: f32,
}

impl HeadingGains {
    /// Add deltas to each gain, flooring at zero.
    pub fn adjusted(self, dkp: f32, dki: f32, dkd: f32) -> Self {
        Self {
            kp: (self.kp + dkp).max(0.0),
            ki: (self.ki + dki).max(0.0),
            kd: (self.kd + dkd).max(0.0),
            deadband: self.deadband,
        }
    }

    /// PID gains for these settings with the given clamp.
    pub fn pid_gains(&self, max_output: f32) -> PidGains {
        PidGains {
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
            max_output,
        }
    }
}

impl From<&HeadingPidConfig> for HeadingGains {
    fn from(c: &HeadingPidConfig) -> Self {
        Self {
            kp: c.kp,
            ki: c.ki,
            kd: c.kd,
            deadband: c.deadband_deg,
        }
    }
}

/// PID controller with wall-clock `dt`.
///
/// Only the output is clamped. The integral term is not bounded, so it keeps
/// accumulating while the output is saturated.
#[derive(Clone, Debug)]
pub struct PidController {
    gains: PidGains,
    integral: f32,
    prev_error: f32,
    last_time: Instant,
}

impl PidController {
    /// Create a controller whose first `dt` is measured from `now`.
    pub fn new(gains: PidGains, now: Instant) -> Self {
        Self {
            gains,
            integral: 0.0,
            prev_error: 0.0,
            last_time: now,
        }
    }

    /// Current gains.
    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Accumulated integral.
    pub fn integral(&self) -> f32 {
        self.integral
    }

    /// Compute the output for `error` sampled at `now`.
    pub fn compute_at(&mut self, error: f32, now: Instant) -> f32 {
        let dt = now
            .saturating_duration_since(self.last_time)
            .as_secs_f32()
            .max(MIN_DT_SECS);
        self.last_time = now;

        self.integral += error * dt;
        let derivative = (error - self.prev_error) / dt;
        self.prev_error = error;

        let g = &self.gains;
        let output = g.kp * error + g.ki * self.integral + g.kd * derivative;
        output.clamp(-g.max_output, g.max_output)
    }

    /// Compute the output for `error` using the wall clock.
    pub fn compute(&mut self, error: f32) -> f32 {
        self.compute_at(error, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn gains(kp: f32, ki: f32, kd: f32, max_output: f32) -> PidGains {
        PidGains {
            kp,
            ki,
            kd,
            max_output,
        }
    }

    #[test]
    fn test_proportional_only_ignores_time() {
        let t0 = Instant::now();
        let mut pid = PidController::new(gains(0.5, 0.0, 0.0, 10.0), t0);

        assert_relative_eq!(pid.compute_at(4.0, t0), 2.0);
        assert_relative_eq!(pid.compute_at(4.0, t0 + Duration::from_secs(7)), 2.0);
        assert_relative_eq!(pid.compute_at(-6.0, t0 + Duration::from_secs(8)), -3.0);
        // Clamped
        assert_relative_eq!(pid.compute_at(100.0, t0 + Duration::from_secs(9)), 10.0);
        assert_relative_eq!(pid.compute_at(-100.0, t0 + Duration::from_secs(9)), -10.0);
    }

    #[test]
    fn test_derivative_uses_elapsed_time() {
        let t0 = Instant::now();
        let mut pid = PidController::new(gains(0.0, 0.0, 1.0, 1000.0), t0);

        // First call: prev_error is 0, dt = 0.5 s
        let out = pid.compute_at(2.0, t0 + Duration::from_millis(500));
        assert_relative_eq!(out, 4.0, epsilon = 1e-4);

        // Constant error: no derivative
        let out = pid.compute_at(2.0, t0 + Duration::from_millis(600));
        assert_relative_eq!(out, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_dt_floor() {
        let t0 = Instant::now();
        let mut pid = PidController::new(gains(0.0, 0.0, 1.0, f32::MAX), t0);

        // Same instant: dt floors at 1 ms
        let out = pid.compute_at(1.0, t0);
        assert_relative_eq!(out, 1000.0, epsilon = 1e-2);
    }

    #[test]
    fn test_heading_gains_floor_at_zero() {
        let g = HeadingGains {
            kp: 0.025,
            ki: 0.0,
            kd: 0.030,
            deadband: 2.0,
        };
        let adjusted = g.adjusted(-0.005, -0.001, 0.005);
        assert_relative_eq!(adjusted.kp, 0.020, epsilon = 1e-6);
        assert_relative_eq!(adjusted.ki, 0.0);
        assert_relative_eq!(adjusted.kd, 0.035, epsilon = 1e-6);
        assert_relative_eq!(adjusted.deadband, 2.0);
    }

    #[test]
    fn test_integral_grows_while_saturated() {
        let t0 = Instant::now();
        let mut pid = PidController::new(gains(0.0, 1.0, 0.0, 0.5), t0);

        for i in 1..=10 {
            let out = pid.compute_at(1.0, t0 + Duration::from_secs(i));
            assert!(out <= 0.5);
        }
        assert_relative_eq!(pid.integral(), 10.0, epsilon = 1e-4);
    }
}
