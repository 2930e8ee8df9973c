//! Multi-threaded architecture for MargaNav.
//!
//! Separates concerns into three threads:
//! - Ingest thread: reads bridge messages and merges them into shared state
//! - Navigation thread: fixed-rate decision loop, publishes commands
//! - Console thread: turns operator input lines into intents

mod console;
mod ingest;
mod navigation;

pub use console::ConsoleThread;
pub use ingest::IngestThread;
pub use navigation::NavigationThread;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use crate::client::{BridgeReader, CommandSink};
use crate::config::MargaConfig;
use crate::error::Result;
use crate::intent::OperatorIntent;
use crate::shared::SharedNavigationState;

/// Thread handles for the multi-threaded system.
pub struct ThreadHandles {
    /// Absent when running without a bridge
    pub ingest: Option<JoinHandle<()>>,
    pub navigation: JoinHandle<()>,
}

/// Spawn the ingest and navigation threads.
pub fn spawn_threads(
    config: MargaConfig,
    shared_state: Arc<SharedNavigationState>,
    reader: Option<BridgeReader>,
    sink: Box<dyn CommandSink>,
    intents: Receiver<OperatorIntent>,
) -> Result<ThreadHandles> {
    let ingest_handle = match reader {
        Some(reader) => {
            let ingest_state = Arc::clone(&shared_state);
            Some(
                thread::Builder::new()
                    .name("ingest".into())
                    .spawn(move || {
                        let mut ingest_thread = IngestThread::new(ingest_state, reader);
                        ingest_thread.run();
                    })?,
            )
        }
        None => None,
    };

    let navigation_handle = thread::Builder::new()
        .name("navigation".into())
        .spawn(move || {
            let mut navigation_thread = NavigationThread::new(config, shared_state, sink, intents);
            navigation_thread.run();
        })?;

    Ok(ThreadHandles {
        ingest: ingest_handle,
        navigation: navigation_handle,
    })
}

/// Spawn the console reader. It blocks on stdin and is never joined.
pub fn spawn_console(config: &MargaConfig, intents: Sender<OperatorIntent>) -> Result<()> {
    let console = ConsoleThread::new(config, intents);
    thread::Builder::new()
        .name("console".into())
        .spawn(move || console.run(std::io::stdin().lock()))?;
    Ok(())
}
