//! Two-grid wall representation of a rectangular maze.
//!
//! A maze of `W × H` cells stores its walls on cell *edges* rather than in
//! the cells themselves:
//!
//! ```text
//!   horizontal edges: (H + 1) rows × W columns   (edge above / below a cell)
//!   vertical edges:   H rows × (W + 1) columns   (edge left / right of a cell)
//!
//!        h[0][0]   h[0][1]
//!      +---------+---------+
//!  v[0][0]  (0,0) v[0][1] (1,0)  v[0][2]
//!      +---------+---------+
//!        h[1][0]   h[1][1]
//! ```
//!
//! Cell `(x, y)` is bounded by `h[y][x]` (top), `h[y + 1][x]` (bottom),
//! `v[y][x]` (left) and `v[y][x + 1]` (right).
//!
//! Each edge holds a tri-state [`WallState`]. The numeric encoding used on
//! disk depends on which tool produced the file; see [`GridDialect`].

mod dialect;
mod wall_grid;

pub use dialect::GridDialect;
pub use wall_grid::{CellWalls, EdgeLayer, WallGrid, WallState};
