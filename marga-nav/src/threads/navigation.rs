//! Navigation thread: fixed-rate decision loop.
//!
//! Each tick drains pending operator intents, copies a sensor snapshot out
//! of shared state, steps the controller and publishes what it produced.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, TryRecvError};

use crate::client::{CommandSink, Outbound};
use crate::clock::SystemClock;
use crate::config::MargaConfig;
use crate::control::{ControllerState, MapEvent, NavigationController, TickReport};
use crate::intent::OperatorIntent;
use crate::shared::SharedNavigationState;

/// Navigation thread state and logic.
pub struct NavigationThread {
    config: MargaConfig,
    shared_state: Arc<SharedNavigationState>,
    controller: NavigationController<SystemClock>,
    sink: Box<dyn CommandSink>,
    intents: Receiver<OperatorIntent>,

    // Status logging
    last_status_time: Instant,
    status_interval: Duration,
}

impl NavigationThread {
    /// Create a new navigation thread.
    pub fn new(
        config: MargaConfig,
        shared_state: Arc<SharedNavigationState>,
        sink: Box<dyn CommandSink>,
        intents: Receiver<OperatorIntent>,
    ) -> Self {
        let controller = NavigationController::new(&config, SystemClock);
        let status_interval = Duration::from_secs(config.control.status_interval_secs);
        Self {
            config,
            shared_state,
            controller,
            sink,
            intents,
            last_status_time: Instant::now(),
            status_interval,
        }
    }

    /// Run the navigation loop until shutdown.
    pub fn run(&mut self) {
        tracing::info!(
            "Navigation thread started ({} Hz)",
            self.config.control.tick_hz
        );

        let loop_interval = self.config.tick_interval();

        loop {
            let loop_start = Instant::now();

            if self.shared_state.should_shutdown() {
                tracing::info!("Navigation thread shutting down");
                break;
            }

            self.drain_intents();
            if self.shared_state.should_shutdown() {
                continue;
            }

            let snapshot = self.shared_state.snapshot();
            let report = self.controller.tick(&snapshot);
            self.publish(report);

            self.shared_state.publish_status(self.controller.status());

            if self.last_status_time.elapsed() >= self.status_interval {
                self.log_status();
                self.last_status_time = Instant::now();
            }

            let elapsed = loop_start.elapsed();
            if elapsed < loop_interval {
                std::thread::sleep(loop_interval - elapsed);
            }
        }

        // Leave the robot stationary
        self.sink.send(&Outbound::stop());
        tracing::info!("Navigation thread exited");
    }

    fn drain_intents(&mut self) {
        loop {
            match self.intents.try_recv() {
                Ok(intent) => self.handle_intent(intent),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Console gone; keep navigating until shutdown
                    break;
                }
            }
        }
    }

    fn handle_intent(&mut self, intent: OperatorIntent) {
        tracing::debug!("Intent: {:?}", intent);
        match intent {
            OperatorIntent::AdjustCalibration { left_mm, right_mm } => {
                let offsets = self.shared_state.adjust_calibration(left_mm, right_mm);
                tracing::info!(
                    "Calibration: left {:+.0}mm, right {:+.0}mm",
                    offsets.left_mm,
                    offsets.right_mm
                );
            }
            OperatorIntent::SaveMap => {
                let maze = &self.config.maze;
                match self
                    .controller
                    .save_map(&maze.mapped_horizontal, &maze.mapped_vertical)
                {
                    Ok(()) => tracing::info!(
                        "Mapped walls saved to {:?} and {:?}",
                        maze.mapped_horizontal,
                        maze.mapped_vertical
                    ),
                    Err(e) => tracing::error!("Failed to save map: {}", e),
                }
            }
            OperatorIntent::Status => self.log_status(),
            OperatorIntent::Quit => {
                tracing::info!("Quit requested");
                self.shared_state.signal_shutdown();
            }
            other => {
                let snapshot = self.shared_state.snapshot();
                let report = self.controller.handle_intent(other, &snapshot);
                self.publish(report);
            }
        }
    }

    fn publish(&mut self, report: TickReport) {
        for command in &report.commands {
            self.sink.send(command);
        }
        for event in &report.map_events {
            match event {
                MapEvent::Plotted { cell, walls } => {
                    tracing::debug!("Map event: plotted {} {:?}", cell, walls)
                }
                MapEvent::Cleared { cell } => tracing::debug!("Map event: cleared {}", cell),
            }
        }
    }

    fn log_status(&self) {
        let snapshot = self.shared_state.snapshot();
        let r = snapshot.readings;
        let walls = self.controller.status().confirmed;
        let decision = match self.controller.decision() {
            Some(d) if self.controller.state() != ControllerState::Idle => {
                format!("{:?} -> {:.0}° ({})", d.action, d.target_yaw, d.rationale_label())
            }
            _ => "-".to_string(),
        };
        tracing::info!(
            "[{:?}] cell=({}, {}) yaw={:.1}° F={:.0} L={:.0} R={:.0} B={:.0} walls=[{}{}{}] tracker={:?} decision={} frames={}",
            self.controller.state(),
            snapshot.cell.x,
            snapshot.cell.y,
            snapshot.yaw,
            r.front,
            r.left,
            r.right,
            r.back,
            if walls.left { "L" } else { "-" },
            if walls.front { "F" } else { "-" },
            if walls.right { "R" } else { "-" },
            snapshot.tracker,
            decision,
            self.shared_state.range_frames()
        );
    }
}
