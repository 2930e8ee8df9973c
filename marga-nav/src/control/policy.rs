//! Right-hand wall-following decision.

use serde::Serialize;

use crate::config::PolicyConfig;
use crate::sensing::{ConfirmedWalls, DirectionalReading};
use crate::utils::{snap_yaw, wrap_degrees};

/// Motion the controller proposes next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Action {
    Stop,
    Forward,
    Backward,
    RotateLeft,
    RotateRight,
    UTurn,
}

impl Action {
    /// True for actions that translate the robot along its heading.
    pub fn is_translation(self) -> bool {
        matches!(self, Action::Forward | Action::Backward)
    }
}

/// Proposed action with its target yaw and diagnostic rationale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Decision {
    pub action: Action,
    /// Target yaw in degrees, [0, 360)
    pub target_yaw: f32,
    /// Index into [`RATIONALES`]
    pub rationale: u8,
}

impl Decision {
    /// Human-readable reason for this decision.
    pub fn rationale_label(&self) -> &'static str {
        RATIONALES
            .get(self.rationale as usize)
            .copied()
            .unwrap_or("unknown")
    }
}

/// Diagnostic labels by rationale index.
///
/// The emergency stop and the boxed-in reverse both report index 0.
pub const RATIONALES: [&str; 5] = [
    "obstacle too close",
    "right side open",
    "front open",
    "left side open",
    "dead end",
];

/// Deterministic right-hand-rule wall follower.
///
/// Priority: emergency stop, boxed-in reverse, then right over front over
/// left, and finally a U-turn.
#[derive(Clone, Copy, Debug)]
pub struct WallFollowingPolicy {
    emergency_stop_mm: f32,
    boxed_in_mm: f32,
}

impl WallFollowingPolicy {
    /// Create a policy with explicit distances.
    pub fn new(emergency_stop_mm: f32, boxed_in_mm: f32) -> Self {
        Self {
            emergency_stop_mm,
            boxed_in_mm,
        }
    }

    /// Create a policy from configuration.
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.emergency_stop_mm, config.boxed_in_mm)
    }

    /// Decide the next action.
    ///
    /// `distances` are the un-debounced distances; `yaw` is the current raw
    /// yaw in degrees.
    pub fn decide(
        &self,
        walls: ConfirmedWalls,
        distances: &DirectionalReading,
        yaw: f32,
    ) -> Decision {
        if distances.front < self.emergency_stop_mm {
            return Decision {
                action: Action::Stop,
                target_yaw: wrap_degrees(yaw),
                rationale: 0,
            };
        }

        let snapped = snap_yaw(yaw);

        let boxed = self.boxed_in_mm;
        if distances.front < boxed && distances.left < boxed && distances.right < boxed {
            return Decision {
                action: Action::Backward,
                target_yaw: snapped,
                rationale: 0,
            };
        }

        let (action, offset, rationale) = if !walls.right {
            (Action::RotateRight, -90.0, 1)
        } else if !walls.front {
            (Action::Forward, 0.0, 2)
        } else if !walls.left {
            (Action::RotateLeft, 90.0, 3)
        } else {
            (Action::UTurn, 180.0, 4)
        };

        Decision {
            action,
            target_yaw: wrap_degrees(snapped + offset),
            rationale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn open_space() -> DirectionalReading {
        DirectionalReading::uniform(2000.0)
    }

    fn walls(front: bool, left: bool, right: bool) -> ConfirmedWalls {
        ConfirmedWalls { front, left, right }
    }

    fn policy() -> WallFollowingPolicy {
        WallFollowingPolicy::new(250.0, 150.0)
    }

    #[test]
    fn test_right_open_always_wins() {
        for front in [false, true] {
            for left in [false, true] {
                let d = policy().decide(walls(front, left, false), &open_space(), 90.0);
                assert_eq!(d.action, Action::RotateRight);
                assert_eq!(d.rationale, 1);
                assert_relative_eq!(d.target_yaw, 0.0);
            }
        }
    }

    #[test]
    fn test_front_then_left_then_uturn() {
        let p = policy();

        let d = p.decide(walls(false, true, true), &open_space(), 181.0);
        assert_eq!((d.action, d.rationale), (Action::Forward, 2));
        assert_relative_eq!(d.target_yaw, 180.0);

        let d = p.decide(walls(true, false, true), &open_space(), 275.0);
        assert_eq!((d.action, d.rationale), (Action::RotateLeft, 3));
        assert_relative_eq!(d.target_yaw, 0.0);

        let d = p.decide(walls(true, true, true), &open_space(), 90.0);
        assert_eq!((d.action, d.rationale), (Action::UTurn, 4));
        assert_relative_eq!(d.target_yaw, 270.0);
    }

    #[test]
    fn test_rotate_right_wraps_below_zero() {
        let d = policy().decide(walls(true, true, false), &open_space(), 3.0);
        assert_relative_eq!(d.target_yaw, 270.0);
    }

    #[test]
    fn test_emergency_stop_keeps_raw_yaw() {
        let near = DirectionalReading {
            front: 249.0,
            ..open_space()
        };
        let d = policy().decide(walls(false, false, false), &near, 97.5);
        assert_eq!(d.action, Action::Stop);
        assert_eq!(d.rationale, 0);
        assert_relative_eq!(d.target_yaw, 97.5);
    }

    #[test]
    fn test_boxed_in_reverses() {
        // Behind the emergency-stop check, so only reachable when the stop
        // distance is the tighter of the two
        let p = WallFollowingPolicy::new(100.0, 150.0);
        let boxed = DirectionalReading {
            front: 140.0,
            left: 120.0,
            right: 130.0,
            back: 2000.0,
        };
        let d = p.decide(walls(true, true, true), &boxed, 92.0);
        assert_eq!(d.action, Action::Backward);
        // Reported with the same rationale index as the emergency stop
        assert_eq!(d.rationale, 0);
        assert_relative_eq!(d.target_yaw, 90.0);
    }

    #[test]
    fn test_rationale_labels() {
        let d = policy().decide(walls(true, true, true), &open_space(), 0.0);
        assert_eq!(d.rationale_label(), "dead end");
    }
}
