//! Integer cell coordinates.

use serde::{Deserialize, Serialize};

use super::Heading;

/// Integer cell index in a maze grid.
///
/// Signed so that neighbours of edge cells can be expressed and then
/// rejected by a bounds check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column (0 = West edge)
    pub x: i32,
    /// Row (0 = North edge)
    pub y: i32,
}

impl GridCoord {
    /// Create a new coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent cell one step in `heading`.
    #[inline]
    pub fn step(self, heading: Heading) -> Self {
        let (dx, dy) = heading.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Heading of travel from `self` to an orthogonally adjacent `to`.
    ///
    /// Returns `None` for identical, diagonal or non-adjacent cells.
    pub fn heading_to(self, to: GridCoord) -> Option<Heading> {
        match (to.x - self.x, to.y - self.y) {
            (0, -1) => Some(Heading::North),
            (1, 0) => Some(Heading::East),
            (0, 1) => Some(Heading::South),
            (-1, 0) => Some(Heading::West),
            _ => None,
        }
    }

    /// Manhattan distance in cells.
    #[inline]
    pub fn manhattan(self, other: GridCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
