//! Wall grid persistence.
//!
//! Each [`WallGrid`](crate::WallGrid) is stored as two CSV-style text files of
//! small integers, one record per edge row:
//!
//! - horizontal edges: `H + 1` rows × `W` columns
//! - vertical edges: `H` rows × `W + 1` columns
//!
//! The integer alphabet depends on the [`GridDialect`](crate::GridDialect)
//! of the tool that wrote the file.
//!
//! ```rust,ignore
//! use marga_map::{GridDialect, io::{load_grid, save_grid}};
//! use std::path::Path;
//!
//! let grid = load_grid(
//!     Path::new("horizontal_walls.csv"),
//!     Path::new("vertical_walls.csv"),
//!     8, 8,
//!     GridDialect::Authoring,
//! )?;
//! save_grid(&grid, Path::new("h.csv"), Path::new("v.csv"), GridDialect::Mapper)?;
//! ```

mod csv_grid;

pub use csv_grid::{
    MapIoError, format_layer, load_grid, load_grid_or_open, parse_layer, read_grid, save_grid,
};
