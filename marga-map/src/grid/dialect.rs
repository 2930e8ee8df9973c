//! On-disk encodings of [`WallState`].
//!
//! The maze editor and the runtime mapper agree that `1` is a wall but
//! disagree on everything else: the editor writes `2` for an open edge and
//! the solver only crosses `2`, while the mapper writes `0` for "no wall
//! recorded". A mapper file fed straight to the solver is therefore fully
//! blocked. Both encodings are kept as explicit dialects and converted only
//! at the load/save boundary; the authoring dialect rejects `0` outright so
//! a mapper file cannot be mistaken for an editor file.

use serde::{Deserialize, Serialize};

use super::WallState;

/// Numeric convention of a persisted wall grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridDialect {
    /// Maze editor / solver input: `1` wall, `2` open. Has no encoding for
    /// an unknown edge.
    #[default]
    Authoring,
    /// Runtime mapper output: `1` wall, `0` unknown, `2` open.
    Mapper,
}

impl GridDialect {
    /// Decode a raw cell value.
    ///
    /// Returns `None` for values outside the dialect's alphabet.
    pub fn decode(self, value: i64) -> Option<WallState> {
        match (self, value) {
            (_, 1) => Some(WallState::Wall),
            (_, 2) => Some(WallState::Open),
            (GridDialect::Mapper, 0) => Some(WallState::Unknown),
            _ => None,
        }
    }

    /// Encode a state as the dialect's raw cell value.
    ///
    /// Returns `None` when the dialect cannot represent the state.
    pub fn encode(self, state: WallState) -> Option<u8> {
        match (self, state) {
            (_, WallState::Wall) => Some(1),
            (_, WallState::Open) => Some(2),
            (GridDialect::Mapper, WallState::Unknown) => Some(0),
            (GridDialect::Authoring, WallState::Unknown) => None,
        }
    }

    /// Value written for edges freshly initialised by this tool.
    pub fn background(self) -> WallState {
        match self {
            GridDialect::Authoring => WallState::Open,
            GridDialect::Mapper => WallState::Unknown,
        }
    }

    /// Human-readable name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            GridDialect::Authoring => "authoring",
            GridDialect::Mapper => "mapper",
        }
    }
}
