//! MargaNav - maze navigation controller for grid-maze robots
//!
//! Connects to a sensor/actuator bridge, fuses four range sensors, proposes
//! wall-following moves for an operator to confirm, maps walls as it goes,
//! and replays shortest routes through a known maze one command at a time.
//!
//! ## Threads
//!
//! - **Ingest**: decodes bridge messages into [`SharedNavigationState`]
//! - **Navigation**: ticks the [`NavigationController`] at a fixed rate
//! - **Console**: parses operator lines into [`OperatorIntent`]s
//!
//! ## Controller states
//!
//! ```text
//! Idle ──eval──► Thinking ──► WaitingForConfirm ──go──► Executing
//!   ▲                ▲                                     │
//!   │                └──────── done / timeout / alert ─────┘
//!   └──stop── (any)            Manual ◄── manual drive intents
//! ```

pub mod client;
pub mod clock;
pub mod config;
pub mod control;
pub mod error;
pub mod intent;
pub mod playback;
pub mod replay;
pub mod sensing;
pub mod shared;
pub mod threads;
pub mod utils;

pub use client::{BridgeClient, BridgeMessage, CommandSink, DriveCommand, Outbound};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::MargaConfig;
pub use control::{ControllerState, NavigationController, WallFollowingPolicy};
pub use error::{MargaError, Result};
pub use intent::{IntentParser, OperatorIntent};
pub use playback::{CommandStepper, StepperStatus};
pub use replay::{ReplaySession, plan_route};
pub use shared::{SensorSnapshot, SharedNavigationState, TrackerTag};
