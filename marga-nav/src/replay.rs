//! Route replay: solve a known maze and step through the commands.

use std::io::BufRead;

use marga_map::io::load_grid_or_open;
use marga_map::{
    BfsPathfinder, CommandCompiler, GridCoord, GridDialect, Heading, PathCommand, WallGrid,
};

use crate::client::CommandSink;
use crate::config::MazeConfig;
use crate::error::Result;
use crate::playback::{CommandStepper, StepperStatus};

/// A solved route and its compiled commands.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutePlan {
    pub path: Vec<GridCoord>,
    pub commands: Vec<PathCommand>,
}

/// Solve `start` to `goal` and compile for `heading`.
///
/// Returns `Ok(None)` when the goal is unreachable.
pub fn plan_route(
    grid: &WallGrid,
    start: GridCoord,
    goal: GridCoord,
    heading: Heading,
) -> Result<Option<RoutePlan>> {
    let path = BfsPathfinder::new().solve(grid, start, goal);
    if path.is_empty() {
        return Ok(None);
    }
    let commands = CommandCompiler::new().compile(&path, heading)?;
    Ok(Some(RoutePlan { path, commands }))
}

/// Load the authored maze, falling back to an all-open grid.
///
/// With `unknown_open`, unknown edges become passable first.
pub fn load_maze(config: &MazeConfig, unknown_open: bool) -> WallGrid {
    let (grid, _) = load_grid_or_open(
        &config.horizontal_walls,
        &config.vertical_walls,
        config.width,
        config.height,
        GridDialect::Authoring,
    );
    if unknown_open {
        grid.with_unknown_as_open()
    } else {
        grid
    }
}

/// What the input loop should do after a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayControl {
    Continue,
    Quit,
}

/// Console-driven stepper over one planned route.
pub struct ReplaySession {
    plan: Option<RoutePlan>,
    stepper: CommandStepper,
}

impl ReplaySession {
    /// Plan the route and load it into a stepper.
    pub fn new(grid: &WallGrid, start: GridCoord, goal: GridCoord, heading: Heading) -> Result<Self> {
        let plan = plan_route(grid, start, goal, heading)?;
        let mut stepper = CommandStepper::new();

        match &plan {
            Some(plan) => {
                tracing::info!(
                    "Route {} -> {}: {} cells, {} commands",
                    start,
                    goal,
                    plan.path.len(),
                    plan.commands.len()
                );
                let names: Vec<&str> = plan.commands.iter().map(|c| c.as_str()).collect();
                tracing::info!("Commands: {}", names.join(", "));
                stepper.load(plan.commands.clone())?;
            }
            None => tracing::warn!("No route from {} to {}", start, goal),
        }

        Ok(Self { plan, stepper })
    }

    /// The planned route, if the goal was reachable.
    pub fn plan(&self) -> Option<&RoutePlan> {
        self.plan.as_ref()
    }

    pub fn stepper(&self) -> &CommandStepper {
        &self.stepper
    }

    /// Handle one console line.
    ///
    /// `g` toggles step mode, `n` or an empty line advances, `f`/`b`/`l`/`r`
    /// send a single override, `q` quits.
    pub fn handle_line(&mut self, line: &str, sink: &mut dyn CommandSink) -> ReplayControl {
        let override_command = match line.trim() {
            "q" => return ReplayControl::Quit,
            "g" => {
                if let Err(e) = self.stepper.toggle() {
                    tracing::warn!("Cannot enter step mode: {}", e);
                }
                return ReplayControl::Continue;
            }
            "" | "n" => {
                match self.stepper.advance(sink) {
                    Ok(_) if self.stepper.status() == StepperStatus::Finished => {
                        tracing::info!("Route complete");
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Cannot advance: {}", e),
                }
                return ReplayControl::Continue;
            }
            "f" => PathCommand::Forward,
            "b" => PathCommand::Backward,
            "l" => PathCommand::Left,
            "r" => PathCommand::Right,
            other => {
                tracing::warn!("Unknown replay input '{}'", other);
                return ReplayControl::Continue;
            }
        };

        self.stepper.override_command(override_command, sink);
        ReplayControl::Continue
    }

    /// Read lines until `q` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R, sink: &mut dyn CommandSink) -> Result<()> {
        for line in input.lines() {
            if self.handle_line(&line?, sink) == ReplayControl::Quit {
                break;
            }
        }
        Ok(())
    }
}
