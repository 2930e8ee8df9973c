//! Core types for the maze model.
//!
//! ## Coordinates
//!
//! Cells are addressed by [`GridCoord`] with `(0, 0)` in the top-left corner:
//! - **X**: column index, increasing to the East
//! - **Y**: row index, increasing to the South
//!
//! ## Headings
//!
//! [`Heading`] is one of the four cardinal directions with the fixed integer
//! mapping `0 = North, 1 = East, 2 = South, 3 = West`. All heading arithmetic
//! is modulo 4; one unit is a 90° clockwise turn.

mod coord;
mod heading;

pub use coord::GridCoord;
pub use heading::Heading;
