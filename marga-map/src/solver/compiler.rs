//! Path to motion command compilation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{GridCoord, Heading};

/// One discrete motion step replayed on the robot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathCommand {
    /// Drive one cell ahead
    Forward,
    /// Reverse one cell
    Backward,
    /// Quarter turn counter-clockwise in place
    Left,
    /// Quarter turn clockwise in place
    Right,
}

impl PathCommand {
    /// Wire name (`FORWARD`, `BACKWARD`, `LEFT`, `RIGHT`).
    pub fn as_str(self) -> &'static str {
        match self {
            PathCommand::Forward => "FORWARD",
            PathCommand::Backward => "BACKWARD",
            PathCommand::Left => "LEFT",
            PathCommand::Right => "RIGHT",
        }
    }
}

impl std::fmt::Display for PathCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error compiling a path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Consecutive path cells are not orthogonal neighbours
    #[error("path step {index}: {from} -> {to} is not a single orthogonal move")]
    NonAdjacent {
        /// Index of the `from` cell in the path
        index: usize,
        /// Cell moved from
        from: GridCoord,
        /// Cell moved to
        to: GridCoord,
    },
}

/// Converts a cell path into turn-and-drive commands.
///
/// For every step the robot first rotates to face the next cell (one `Right`,
/// one `Left`, or two `Right`s for a half turn) and then drives `Forward`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommandCompiler;

impl CommandCompiler {
    /// Create a compiler.
    pub fn new() -> Self {
        Self
    }

    /// Compile `path` for a robot initially facing `start_heading`.
    ///
    /// Paths with fewer than two cells compile to an empty sequence.
    pub fn compile(
        &self,
        path: &[GridCoord],
        start_heading: Heading,
    ) -> Result<Vec<PathCommand>, CompileError> {
        let mut commands = Vec::new();
        let mut heading = start_heading;

        for (index, pair) in path.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let target = from
                .heading_to(to)
                .ok_or(CompileError::NonAdjacent { index, from, to })?;

            match heading.turn_to(target) {
                1 => commands.push(PathCommand::Right),
                -1 => commands.push(PathCommand::Left),
                2 => commands.extend([PathCommand::Right, PathCommand::Right]),
                _ => {}
            }
            commands.push(PathCommand::Forward);
            heading = target;
        }

        Ok(commands)
    }
}
