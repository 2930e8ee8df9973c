//! Cardinal headings with modulo-4 arithmetic.

use serde::{Deserialize, Serialize};

/// One of the four cardinal directions.
///
/// The discriminant is the fixed integer encoding used on the wire and in
/// command compilation: `0 = North, 1 = East, 2 = South, 3 = West`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Heading {
    /// Towards row 0
    North = 0,
    /// Towards increasing column
    East = 1,
    /// Towards increasing row
    #[default]
    South = 2,
    /// Towards column 0
    West = 3,
}

impl Heading {
    /// All headings in index order (also the BFS expansion order).
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Integer index in `[0, 4)`.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Heading for an arbitrary integer, taken modulo 4.
    #[inline]
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    /// Rotate by `quarter_turns` clockwise (negative = counter-clockwise).
    #[inline]
    pub fn rotated(self, quarter_turns: i32) -> Self {
        Self::from_index(self.index() as i32 + quarter_turns)
    }

    /// Heading 90° clockwise.
    #[inline]
    pub fn right(self) -> Self {
        self.rotated(1)
    }

    /// Heading 90° counter-clockwise.
    #[inline]
    pub fn left(self) -> Self {
        self.rotated(-1)
    }

    /// Heading 180° around.
    #[inline]
    pub fn opposite(self) -> Self {
        self.rotated(2)
    }

    /// Signed turn from `self` to `target` in quarter turns, normalised to
    /// `{-1, 0, 1, 2}` (a half turn is always reported as `+2`).
    pub fn turn_to(self, target: Heading) -> i32 {
        match (target.index() as i32 - self.index() as i32).rem_euclid(4) {
            3 => -1,
            d => d,
        }
    }

    /// Unit cell offset `(dx, dy)` for one step in this heading.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, -1),
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
        }
    }

    /// Single-letter label.
    pub const fn as_char(self) -> char {
        match self {
            Heading::North => 'N',
            Heading::East => 'E',
            Heading::South => 'S',
            Heading::West => 'W',
        }
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl std::str::FromStr for Heading {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" | "NORTH" | "0" => Ok(Heading::North),
            "E" | "EAST" | "1" => Ok(Heading::East),
            "S" | "SOUTH" | "2" => Ok(Heading::South),
            "W" | "WEST" | "3" => Ok(Heading::West),
            other => Err(format!("unknown heading '{}'", other)),
        }
    }
}
