//! MargaNav command-line entry point.
//!
//! ```bash
//! # Wall-following navigation against the bridge
//! marga-nav navigate --bridge 192.168.1.50
//!
//! # Step through the shortest route in the authored maze
//! marga-nav replay --start 0,0 --goal 7,7 --heading S
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use marga_map::{GridCoord, Heading};
use marga_nav::client::{BridgeClient, CommandSink, OfflineSink, Outbound};
use marga_nav::config::MargaConfig;
use marga_nav::error::{MargaError, Result};
use marga_nav::replay::{ReplaySession, load_maze};
use marga_nav::shared::SharedNavigationState;
use marga_nav::threads::{spawn_console, spawn_threads};

/// Ingest read timeout, bounds how long shutdown can go unnoticed
const READ_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "marga-nav")]
#[command(about = "Grid-maze navigation controller and route replay")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to marga.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bridge address, overrides the configuration
    #[arg(long)]
    bridge: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Operator-confirmed wall following with live mapping
    Navigate,
    /// Solve the authored maze and step through the route
    Replay {
        /// Start cell as X,Y
        #[arg(long, value_parser = parse_cell, default_value = "0,0")]
        start: GridCoord,

        /// Goal cell as X,Y
        #[arg(long, value_parser = parse_cell)]
        goal: GridCoord,

        /// Initial heading (N, E, S or W)
        #[arg(long, default_value = "S")]
        heading: Heading,

        /// Treat unknown edges as passable
        #[arg(long)]
        unknown_open: bool,
    },
}

fn parse_cell(s: &str) -> std::result::Result<GridCoord, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    let x = x.trim().parse::<i32>().map_err(|e| format!("bad X '{}': {}", x, e))?;
    let y = y.trim().parse::<i32>().map_err(|e| format!("bad Y '{}': {}", y, e))?;
    Ok(GridCoord::new(x, y))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("marga_nav=info".parse().unwrap())
                .add_directive("marga_map=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = MargaConfig::resolve(cli.config.as_deref())?;
    if let Some(ip) = cli.bridge {
        info!("Using bridge address: {}", ip);
        config.connection.bridge_ip = ip;
    }

    info!("MargaNav v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Navigate => navigate(config),
        Command::Replay {
            start,
            goal,
            heading,
            unknown_open,
        } => replay(config, start, goal, heading, unknown_open),
    }
}

/// Connect to the bridge. `None` means commands are only logged.
fn connect(config: &MargaConfig) -> Option<BridgeClient> {
    let timeout = Duration::from_millis(config.connection.timeout_ms);
    info!("Connecting to {}", config.address());
    match BridgeClient::connect_timeout(&config.address(), timeout) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("Bridge unavailable ({}), running offline", e);
            None
        }
    }
}

fn navigate(config: MargaConfig) -> Result<()> {
    let shared_state = Arc::new(SharedNavigationState::new(&config.sensing));

    let client = connect(&config);
    let reader = client
        .as_ref()
        .map(|c| c.reader(READ_TIMEOUT))
        .transpose()?;
    let sink: Box<dyn CommandSink> = match client {
        Some(client) => Box::new(client),
        None => Box::new(OfflineSink),
    };

    let handler_state = Arc::clone(&shared_state);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        handler_state.signal_shutdown();
    })
    .map_err(|e| MargaError::Config(format!("Error setting Ctrl-C handler: {}", e)))?;

    let (intent_tx, intent_rx) = crossbeam_channel::unbounded();
    spawn_console(&config, intent_tx)?;

    info!("Starting navigation (eval, go, stop, fwd/back/left/right, plot, save, quit)");
    let handles = spawn_threads(config, Arc::clone(&shared_state), reader, sink, intent_rx)?;

    // Main thread: monitor until shutdown or a worker exits
    let check_interval = Duration::from_millis(500);
    loop {
        std::thread::sleep(check_interval);

        if shared_state.should_shutdown() {
            break;
        }

        if handles.navigation.is_finished()
            || handles.ingest.as_ref().is_some_and(|h| h.is_finished())
        {
            warn!("A worker thread exited unexpectedly");
            break;
        }
    }

    shared_state.signal_shutdown();

    info!("Waiting for threads to finish...");
    let join_timeout = Duration::from_secs(5);
    let join_start = Instant::now();

    if let Err(e) = handles.navigation.join() {
        error!("Navigation thread panicked: {:?}", e);
    }

    if let Some(ingest) = handles.ingest
        && join_start.elapsed() < join_timeout
        && let Err(e) = ingest.join()
    {
        error!("Ingest thread panicked: {:?}", e);
    }

    info!("MargaNav finished");
    Ok(())
}

fn replay(
    config: MargaConfig,
    start: GridCoord,
    goal: GridCoord,
    heading: Heading,
    unknown_open: bool,
) -> Result<()> {
    let grid = load_maze(&config.maze, unknown_open);
    let mut session = ReplaySession::new(&grid, start, goal, heading)?;
    info!("Replay keys: g = start/pause, n or Enter = step, f/b/l/r = override, q = quit");

    let mut sink: Box<dyn CommandSink> = match connect(&config) {
        Some(client) => Box::new(client),
        None => Box::new(OfflineSink),
    };

    session.run(std::io::stdin().lock(), &mut *sink)?;
    sink.send(&Outbound::stop());
    info!("Replay finished");
    Ok(())
}
