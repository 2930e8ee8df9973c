//! # MargaMap
//!
//! Wall-grid maze model, shortest-path solver and motion command compiler.
//!
//! ## Overview
//!
//! A maze of `W × H` square cells is described by the walls on cell edges
//! rather than by cell occupancy. Every edge is in one of three states:
//!
//! - **Unknown** - Not observed yet (fresh mapper output)
//! - **Open** - Passable
//! - **Wall** - Blocked
//!
//! ## Features
//!
//! - **Edge Grid**: Two-layer storage shared by neighbouring cells
//! - **CSV Persistence**: Integer layers in authoring or mapper dialect
//! - **BFS Solver**: Deterministic North/East/South/West expansion order
//! - **Command Compiler**: Path to `RIGHT`/`LEFT`/`FORWARD` steps
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marga_map::{BfsPathfinder, CommandCompiler, GridCoord, Heading, WallGrid};
//!
//! let grid = WallGrid::with_border(8, 8);
//! let path = BfsPathfinder::new().solve(&grid, GridCoord::new(0, 0), GridCoord::new(7, 7));
//! let commands = CommandCompiler::new().compile(&path, Heading::South)?;
//! ```
//!
//! ## Coordinate System
//!
//! - X: column, grows East
//! - Y: row, grows South (row 0 is the North edge)
//! - Heading: `0 = North, 1 = East, 2 = South, 3 = West`

#![warn(missing_docs)]

// Core types
pub mod core;

// Edge storage
pub mod grid;

// Persistence (load/save)
pub mod io;

// Pathfinding and command compilation
pub mod solver;

pub use core::{GridCoord, Heading};
pub use grid::{CellWalls, EdgeLayer, GridDialect, WallGrid, WallState};
pub use io::MapIoError;
pub use solver::{BfsPathfinder, CommandCompiler, CompileError, PathCommand};
