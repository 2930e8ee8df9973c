//! Decision and control.
//!
//! - [`PidController`]: generic PID used for heading hold and centering
//! - [`WallFollowingPolicy`]: pure right-hand-rule decision
//! - [`NavigationController`]: the finite-state controller driving a tick

mod pid;
mod policy;
mod state_machine;

pub use pid::{HeadingGains, MIN_DT_SECS, PidController, PidGains};
pub use policy::{Action, Decision, RATIONALES, WallFollowingPolicy};
pub use state_machine::{
    ControllerState, ControllerStatus, MapEvent, NavigationController, TickReport,
};
