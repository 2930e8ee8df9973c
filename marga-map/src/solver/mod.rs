//! Shortest-path search and path-to-command compilation.
//!
//! [`BfsPathfinder`] finds a fewest-steps route through a [`WallGrid`](crate::WallGrid)
//! and [`CommandCompiler`] turns that route into the discrete motion commands a
//! robot replays one at a time.

mod bfs;
mod compiler;

pub use bfs::BfsPathfinder;
pub use compiler::{CommandCompiler, CompileError, PathCommand};
