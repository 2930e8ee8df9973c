//! Operator intents and the console words that produce them.

use crate::config::MargaConfig;

/// A request from the operator to the navigation thread.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OperatorIntent {
    /// Run the wall-following policy once
    Evaluate,
    /// Execute the proposed action
    Confirm,
    /// Halt and return to idle
    Stop,
    /// Set manual velocity axes; `None` keeps the current value
    ManualVelocity {
        vx: Option<f32>,
        vy: Option<f32>,
        wz: Option<f32>,
    },
    /// Zero every manual axis
    ManualRelease,
    /// Hold a heading while driving manually (`None` releases)
    ManualHeadingLock(Option<f32>),
    /// Heading-hold gain deltas
    AdjustHeadingGains { kp: f32, ki: f32, kd: f32 },
    /// Side sensor calibration deltas, mm
    AdjustCalibration { left_mm: f32, right_mm: f32 },
    /// Record walls around the current cell
    PlotWalls,
    /// Forget walls around the current cell
    ClearWalls,
    /// Write the mapped grid to disk
    SaveMap,
    /// Log a status line now
    Status,
    /// Shut down
    Quit,
}

/// Heading locks the operator can pick, in degrees.
pub const HEADING_LOCKS: [f32; 4] = [0.0, 90.0, 180.0, 270.0];

/// Console word parser with step sizes taken from configuration.
#[derive(Clone, Copy, Debug)]
pub struct IntentParser {
    manual_speed: f32,
    calibration_step: f32,
    kp_step: f32,
    ki_step: f32,
    kd_step: f32,
}

impl IntentParser {
    pub fn new(config: &MargaConfig) -> Self {
        let heading = &config.control.heading_pid;
        Self {
            manual_speed: config.control.manual_speed,
            calibration_step: config.sensing.calibration_step_mm,
            kp_step: heading.kp_step,
            ki_step: heading.ki_step,
            kd_step: heading.kd_step,
        }
    }

    /// Parse one console line. Returns `None` for unknown input.
    pub fn parse(&self, line: &str) -> Option<OperatorIntent> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let speed = self.manual_speed;
        let cal = self.calibration_step;

        let manual = |vx: Option<f32>, vy: Option<f32>, wz: Option<f32>| {
            Some(OperatorIntent::ManualVelocity { vx, vy, wz })
        };
        let gains = |kp: f32, ki: f32, kd: f32| Some(OperatorIntent::AdjustHeadingGains { kp, ki, kd });
        let calibrate = |left_mm: f32, right_mm: f32| {
            Some(OperatorIntent::AdjustCalibration { left_mm, right_mm })
        };

        match words.as_slice() {
            ["eval"] => Some(OperatorIntent::Evaluate),
            ["go"] => Some(OperatorIntent::Confirm),
            ["stop"] => Some(OperatorIntent::Stop),
            ["fwd"] => manual(None, Some(speed), None),
            ["back"] => manual(None, Some(-speed), None),
            ["left"] => manual(Some(-speed), None, None),
            ["right"] => manual(Some(speed), None, None),
            ["ccw"] => manual(None, None, Some(speed)),
            ["cw"] => manual(None, None, Some(-speed)),
            ["release"] => Some(OperatorIntent::ManualRelease),
            ["lock", deg] => {
                let deg: f32 = deg.parse().ok()?;
                HEADING_LOCKS
                    .contains(&deg)
                    .then_some(OperatorIntent::ManualHeadingLock(Some(deg)))
            }
            ["unlock"] => Some(OperatorIntent::ManualHeadingLock(None)),
            ["kp+"] => gains(self.kp_step, 0.0, 0.0),
            ["kp-"] => gains(-self.kp_step, 0.0, 0.0),
            ["ki+"] => gains(0.0, self.ki_step, 0.0),
            ["ki-"] => gains(0.0, -self.ki_step, 0.0),
            ["kd+"] => gains(0.0, 0.0, self.kd_step),
            ["kd-"] => gains(0.0, 0.0, -self.kd_step),
            ["cal", "l+"] => calibrate(cal, 0.0),
            ["cal", "l-"] => calibrate(-cal, 0.0),
            ["cal", "r+"] => calibrate(0.0, cal),
            ["cal", "r-"] => calibrate(0.0, -cal),
            ["plot"] => Some(OperatorIntent::PlotWalls),
            ["clear"] => Some(OperatorIntent::ClearWalls),
            ["save"] => Some(OperatorIntent::SaveMap),
            ["status"] => Some(OperatorIntent::Status),
            ["quit"] => Some(OperatorIntent::Quit),
            _ => None,
        }
    }
}
