//! Gated playback of a compiled command sequence.
//!
//! The stepper dispatches exactly one command per operator confirmation.
//!
//! ```text
//!   Idle ──load──▶ Ready ──toggle──▶ AwaitingStep ──advance (last)──▶ Finished
//!                    │                 │    ▲                            │
//!                    │ advance         │    │ toggle                     │ load
//!                    ▼                 ▼    │                            ▼
//!               AwaitingStep          Paused                            Ready
//! ```

use marga_map::PathCommand;
use serde::Serialize;
use thiserror::Error;

use crate::client::{CommandSink, Outbound};

/// Stepper status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum StepperStatus {
    /// No sequence loaded
    #[default]
    Idle,
    /// Sequence loaded, cursor at 0, step mode not entered
    Ready,
    /// In step mode, waiting for the next confirmation
    AwaitingStep,
    /// Step mode paused by the operator
    Paused,
    /// Every command dispatched
    Finished,
}

/// Rejected stepper operation. The stepper is unchanged when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepperError {
    #[error("no command sequence loaded")]
    NoSequence,

    #[error("cannot load a new plan while stepping")]
    Busy,

    #[error("sequence exhausted after {len} commands")]
    Exhausted { len: usize },

    #[error("cannot advance while {status:?}")]
    NotStepping { status: StepperStatus },
}

/// Plays back a command sequence one confirmed step at a time.
#[derive(Clone, Debug, Default)]
pub struct CommandStepper {
    commands: Vec<PathCommand>,
    cursor: usize,
    status: StepperStatus,
}

impl CommandStepper {
    /// Create an empty stepper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    pub fn status(&self) -> StepperStatus {
        self.status
    }

    /// Index of the next command to dispatch.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Loaded sequence.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Commands not yet dispatched.
    pub fn remaining(&self) -> usize {
        self.commands.len() - self.cursor
    }

    /// Load a freshly compiled sequence.
    ///
    /// Rejected while a sequence is being stepped. An empty sequence leaves
    /// the stepper `Idle`.
    pub fn load(&mut self, commands: Vec<PathCommand>) -> Result<(), StepperError> {
        if self.status == StepperStatus::AwaitingStep {
            tracing::warn!("Rejected new plan: stepping in progress");
            return Err(StepperError::Busy);
        }

        self.cursor = 0;
        self.status = if commands.is_empty() {
            StepperStatus::Idle
        } else {
            StepperStatus::Ready
        };
        tracing::info!("Loaded {} commands", commands.len());
        self.commands = commands;
        Ok(())
    }

    /// Enter step mode (cursor back to 0) or pause it.
    ///
    /// A finished sequence is spent: stepping again needs a fresh `load`.
    pub fn toggle(&mut self) -> Result<StepperStatus, StepperError> {
        self.status = match self.status {
            StepperStatus::Idle | StepperStatus::Finished => return Err(StepperError::NoSequence),
            StepperStatus::AwaitingStep => StepperStatus::Paused,
            StepperStatus::Ready | StepperStatus::Paused => {
                self.cursor = 0;
                StepperStatus::AwaitingStep
            }
        };
        tracing::info!("Step mode: {:?} (cursor {})", self.status, self.cursor);
        Ok(self.status)
    }

    /// Dispatch the command at the cursor and move on.
    ///
    /// Valid in `Ready` or `AwaitingStep`. Reaching the end of the sequence
    /// switches to `Finished`; further calls are rejected.
    pub fn advance(&mut self, sink: &mut dyn CommandSink) -> Result<PathCommand, StepperError> {
        match self.status {
            StepperStatus::Ready | StepperStatus::AwaitingStep => {}
            StepperStatus::Finished => {
                return Err(StepperError::Exhausted {
                    len: self.commands.len(),
                });
            }
            StepperStatus::Idle => return Err(StepperError::NoSequence),
            status @ StepperStatus::Paused => return Err(StepperError::NotStepping { status }),
        }

        let Some(&command) = self.commands.get(self.cursor) else {
            self.status = StepperStatus::Finished;
            return Err(StepperError::Exhausted {
                len: self.commands.len(),
            });
        };

        sink.send(&Outbound::Step { command });
        self.cursor += 1;

        self.status = if self.cursor >= self.commands.len() {
            StepperStatus::Finished
        } else {
            StepperStatus::AwaitingStep
        };
        tracing::info!(
            "Step {}/{}: {}",
            self.cursor,
            self.commands.len(),
            command
        );
        Ok(command)
    }

    /// Send a single command outside the sequence. The cursor is unchanged.
    pub fn override_command(&self, command: PathCommand, sink: &mut dyn CommandSink) {
        tracing::info!("Manual override: {}", command);
        sink.send(&Outbound::Step { command });
    }

    /// Drop the sequence and return to `Idle`.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.cursor = 0;
        self.status = StepperStatus::Idle;
    }
}
