//! Navigation state machine.
//!
//! ```text
//!            evaluate               (policy runs once)
//!   Idle ─────────────▶ Thinking ─────────────────────▶ WaitingForConfirm
//!                          ▲                                   │ confirm
//!                          │ timeout / tracker alert           ▼
//!                          └────────────────────────────── Executing
//!
//!   any ── manual drive ──▶ Manual        any ── stop ──▶ Idle
//! ```
//!
//! The controller never blocks and never publishes on its own. Each call to
//! [`NavigationController::tick`] or [`NavigationController::handle_intent`]
//! returns the commands to send; the caller publishes them after releasing
//! any locks.

use std::path::Path;
use std::time::{Duration, Instant};

use marga_map::io::save_grid;
use marga_map::{CellWalls, GridCoord, GridDialect, MapIoError, WallGrid};
use serde::Serialize;

use crate::client::{DriveCommand, Outbound};
use crate::clock::{Clock, SystemClock};
use crate::config::MargaConfig;
use crate::intent::OperatorIntent;
use crate::sensing::{ConfirmedWalls, WallConfirmationTracker};
use crate::shared::SensorSnapshot;
use crate::utils::{angle_difference, heading_from_yaw};

use super::pid::{HeadingGains, PidController, PidGains};
use super::policy::{Action, Decision, WallFollowingPolicy};

/// Controller state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ControllerState {
    #[default]
    Idle,
    Thinking,
    WaitingForConfirm,
    Executing,
    Manual,
}

/// Wall-grid mutation for an external writer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MapEvent {
    Plotted { cell: GridCoord, walls: CellWalls },
    Cleared { cell: GridCoord },
}

/// Output of one tick or intent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Commands to publish, in order
    pub commands: Vec<Outbound>,
    pub map_events: Vec<MapEvent>,
}

impl TickReport {
    fn command(command: Outbound) -> Self {
        Self {
            commands: vec![command],
            map_events: Vec::new(),
        }
    }

    fn event(event: Option<MapEvent>) -> Self {
        Self {
            commands: Vec::new(),
            map_events: event.into_iter().collect(),
        }
    }
}

/// Diagnostics for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ControllerStatus {
    pub state: ControllerState,
    /// Last decision the policy produced
    pub decision: Option<Decision>,
    pub confirmed: ConfirmedWalls,
    pub heading_gains: HeadingGains,
    pub last_plotted: Option<GridCoord>,
}

/// Operator-driven velocity while in `Manual`.
#[derive(Clone, Copy, Debug, Default)]
struct ManualDrive {
    vx: f32,
    vy: f32,
    wz: f32,
    heading_lock: Option<f32>,
    last_sent: Option<Instant>,
}

/// Fixed timing and speed settings.
#[derive(Clone, Copy, Debug)]
struct Settings {
    execution_timeout: Duration,
    drive_speed: f32,
    manual_send_interval: Duration,
    lateral_trust_mm: f32,
    heading_max_output: f32,
}

/// Finite-state navigation controller.
pub struct NavigationController<C: Clock = SystemClock> {
    clock: C,
    settings: Settings,
    tracker: WallConfirmationTracker,
    policy: WallFollowingPolicy,
    center_pid: PidController,
    heading_pid: PidController,
    heading_gains: HeadingGains,

    state: ControllerState,
    decision: Option<Decision>,
    confirmed: ConfirmedWalls,
    execution_start: Option<Instant>,
    manual: ManualDrive,

    /// Walls recorded by plot/clear (mapper dialect on disk)
    mapper: WallGrid,
    last_plotted: Option<GridCoord>,
}

impl<C: Clock> NavigationController<C> {
    /// Create a controller in `Idle` with an all-unknown mapper grid.
    pub fn new(config: &MargaConfig, clock: C) -> Self {
        let now = clock.now();
        let control = &config.control;
        let heading_gains = HeadingGains::from(&control.heading_pid);
        let heading_max_output = control.heading_pid.max_output;

        Self {
            settings: Settings {
                execution_timeout: Duration::from_secs_f32(control.execution_timeout_secs),
                drive_speed: control.drive_speed,
                manual_send_interval: Duration::from_millis(control.manual_send_interval_ms),
                lateral_trust_mm: control.lateral_trust_mm,
                heading_max_output,
            },
            tracker: WallConfirmationTracker::new(
                config.sensing.wall_threshold_mm,
                Duration::from_secs_f32(config.sensing.wall_dwell_secs),
            ),
            policy: WallFollowingPolicy::from_config(&config.policy),
            center_pid: PidController::new(PidGains::from(control.center_pid), now),
            heading_pid: PidController::new(heading_gains.pid_gains(heading_max_output), now),
            heading_gains,
            state: ControllerState::Idle,
            decision: None,
            confirmed: ConfirmedWalls::default(),
            execution_start: None,
            manual: ManualDrive::default(),
            mapper: WallGrid::unknown(config.maze.width, config.maze.height),
            last_plotted: None,
            clock,
        }
    }

    /// Current state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Last policy decision.
    pub fn decision(&self) -> Option<Decision> {
        self.decision
    }

    /// Current heading-hold gains.
    pub fn heading_gains(&self) -> HeadingGains {
        self.heading_gains
    }

    /// Walls recorded so far.
    pub fn mapper(&self) -> &WallGrid {
        &self.mapper
    }

    /// Diagnostics snapshot.
    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            state: self.state,
            decision: self.decision,
            confirmed: self.confirmed,
            heading_gains: self.heading_gains,
            last_plotted: self.last_plotted,
        }
    }

    /// Run one control cycle.
    ///
    /// Order: wall confirmation, automatic plot, then the state's own work.
    pub fn tick(&mut self, snapshot: &SensorSnapshot) -> TickReport {
        let now = self.clock.now();
        let mut report = TickReport::default();

        self.confirmed = self.tracker.update(&snapshot.readings, now);

        let alert = snapshot.tracker.is_alert();
        if alert && self.last_plotted != Some(snapshot.cell) {
            report.map_events.extend(self.plot(snapshot));
        }

        match self.state {
            ControllerState::Idle | ControllerState::WaitingForConfirm => {}

            ControllerState::Thinking => {
                let decision = self
                    .policy
                    .decide(self.confirmed, &snapshot.readings, snapshot.yaw);
                tracing::info!(
                    "Proposed {:?} to {:.0}° ({})",
                    decision.action,
                    decision.target_yaw,
                    decision.rationale_label()
                );
                self.decision = Some(decision);
                self.transition(ControllerState::WaitingForConfirm);
            }

            ControllerState::Executing => {
                let elapsed = self
                    .execution_start
                    .map(|start| now.saturating_duration_since(start))
                    .unwrap_or_default();

                if alert {
                    tracing::info!("Tracker reported {:?}, re-evaluating", snapshot.tracker);
                    report.commands.push(Outbound::stop());
                    self.finish_execution();
                } else if elapsed >= self.settings.execution_timeout {
                    tracing::debug!("Execution finished after {:?}", elapsed);
                    report.commands.push(Outbound::stop());
                    self.finish_execution();
                } else if let Some(decision) = self.decision {
                    report
                        .commands
                        .push(Outbound::Drive(self.drive_command(decision, snapshot, now)));
                }
            }

            ControllerState::Manual => {
                let due = self.manual.last_sent.is_none_or(|last| {
                    now.saturating_duration_since(last) >= self.settings.manual_send_interval
                });
                if due {
                    self.manual.last_sent = Some(now);
                    report.commands.push(Outbound::Drive(DriveCommand {
                        vx: self.manual.vx,
                        vy: self.manual.vy,
                        wz: Some(self.manual.wz),
                        target_yaw: self.manual.heading_lock,
                    }));
                }
            }
        }

        report
    }

    /// Apply an operator intent.
    ///
    /// Calibration, saving, status and quit are owned by the navigation
    /// thread and produce nothing here.
    pub fn handle_intent(&mut self, intent: OperatorIntent, snapshot: &SensorSnapshot) -> TickReport {
        match intent {
            OperatorIntent::Evaluate => {
                self.transition(ControllerState::Thinking);
                TickReport::default()
            }

            OperatorIntent::Confirm => {
                if self.state == ControllerState::WaitingForConfirm {
                    self.execution_start = Some(self.clock.now());
                    self.transition(ControllerState::Executing);
                } else {
                    tracing::warn!("Nothing to confirm in state {:?}", self.state);
                }
                TickReport::default()
            }

            OperatorIntent::Stop => {
                self.execution_start = None;
                self.manual = ManualDrive::default();
                self.transition(ControllerState::Idle);
                TickReport::command(Outbound::stop())
            }

            OperatorIntent::ManualVelocity { vx, vy, wz } => {
                self.enter_manual();
                if let Some(vx) = vx {
                    self.manual.vx = vx;
                }
                if let Some(vy) = vy {
                    self.manual.vy = vy;
                }
                if let Some(wz) = wz {
                    self.manual.wz = wz;
                }
                TickReport::default()
            }

            OperatorIntent::ManualRelease => {
                self.manual.vx = 0.0;
                self.manual.vy = 0.0;
                self.manual.wz = 0.0;
                TickReport::default()
            }

            OperatorIntent::ManualHeadingLock(lock) => {
                self.enter_manual();
                tracing::info!("Manual heading lock: {:?}", lock);
                self.manual.heading_lock = lock;
                TickReport::default()
            }

            OperatorIntent::AdjustHeadingGains { kp, ki, kd } => self.retune(kp, ki, kd),

            OperatorIntent::PlotWalls => TickReport::event(self.plot(snapshot)),

            OperatorIntent::ClearWalls => TickReport::event(self.clear(snapshot.cell)),

            OperatorIntent::AdjustCalibration { .. }
            | OperatorIntent::SaveMap
            | OperatorIntent::Status
            | OperatorIntent::Quit => TickReport::default(),
        }
    }

    /// Write the mapper grid as two CSV files.
    pub fn save_map(&self, horizontal: &Path, vertical: &Path) -> Result<(), MapIoError> {
        save_grid(&self.mapper, horizontal, vertical, GridDialect::Mapper)
    }

    fn transition(&mut self, next: ControllerState) {
        if next != self.state {
            tracing::info!("State: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn finish_execution(&mut self) {
        self.execution_start = None;
        self.transition(ControllerState::Thinking);
    }

    fn enter_manual(&mut self) {
        if self.state != ControllerState::Manual {
            self.manual.last_sent = None;
            self.execution_start = None;
            self.transition(ControllerState::Manual);
        }
    }

    fn drive_command(&mut self, decision: Decision, snapshot: &SensorSnapshot, now: Instant) -> DriveCommand {
        let target_yaw = Some(decision.target_yaw);
        if !decision.action.is_translation() {
            return DriveCommand {
                vx: 0.0,
                vy: 0.0,
                wz: None,
                target_yaw,
            };
        }

        let vy = if decision.action == Action::Forward {
            self.settings.drive_speed
        } else {
            -self.settings.drive_speed
        };

        // Centering only when both side walls are close enough to trust
        let r = &snapshot.readings;
        let trust = self.settings.lateral_trust_mm;
        let vx = if r.left < trust && r.right < trust {
            -self.center_pid.compute_at(r.left - r.right, now)
        } else {
            0.0
        };

        let mut heading_error = angle_difference(decision.target_yaw, snapshot.yaw);
        if heading_error.abs() < self.heading_gains.deadband {
            heading_error = 0.0;
        }
        let wz = self.heading_pid.compute_at(heading_error, now);

        DriveCommand {
            vx,
            vy,
            wz: Some(wz),
            target_yaw,
        }
    }

    fn retune(&mut self, dkp: f32, dki: f32, dkd: f32) -> TickReport {
        let gains = self.heading_gains.adjusted(dkp, dki, dkd);
        if gains == self.heading_gains {
            return TickReport::default();
        }

        tracing::info!(
            "Heading gains: kp={:.3} ki={:.3} kd={:.3}",
            gains.kp,
            gains.ki,
            gains.kd
        );
        self.heading_gains = gains;
        self.heading_pid = PidController::new(
            gains.pid_gains(self.settings.heading_max_output),
            self.clock.now(),
        );
        TickReport::command(Outbound::HeadingTune(gains))
    }

    /// Record walls seen from the current cell using smoothed distances.
    fn plot(&mut self, snapshot: &SensorSnapshot) -> Option<MapEvent> {
        let cell = snapshot.cell;
        let heading = heading_from_yaw(snapshot.yaw);
        let threshold = self.tracker.threshold();
        let r = &snapshot.readings;

        let mut walls = CellWalls::default();
        if r.front < threshold {
            walls.set(heading, true);
        }
        if r.right < threshold {
            walls.set(heading.right(), true);
        }
        if r.left < threshold {
            walls.set(heading.left(), true);
        }

        self.last_plotted = Some(cell);
        if !self.mapper.plot_cell(cell, walls) {
            tracing::warn!("Cannot plot {}: outside the maze", cell);
            return None;
        }

        tracing::info!("Plotted {} facing {}: {} wall(s)", cell, heading, walls.count());
        Some(MapEvent::Plotted { cell, walls })
    }

    fn clear(&mut self, cell: GridCoord) -> Option<MapEvent> {
        if !self.mapper.clear_cell(cell) {
            tracing::warn!("Cannot clear {}: outside the maze", cell);
            return None;
        }
        if self.last_plotted == Some(cell) {
            self.last_plotted = None;
        }
        tracing::info!("Cleared {}", cell);
        Some(MapEvent::Cleared { cell })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::sensing::DirectionalReading;
    use crate::shared::TrackerTag;
    use approx::assert_relative_eq;
    use marga_map::{Heading, WallState};

    fn snapshot(readings: DirectionalReading, yaw: f32) -> SensorSnapshot {
        SensorSnapshot {
            readings,
            yaw,
            cell: GridCoord::new(2, 2),
            tracker: TrackerTag::Normal,
        }
    }

    fn open() -> DirectionalReading {
        DirectionalReading::uniform(2000.0)
    }

    fn controller() -> (NavigationController<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (NavigationController::new(&MargaConfig::default(), clock.clone()), clock)
    }

    fn drive(report: &TickReport) -> DriveCommand {
        match report.commands.as_slice() {
            [Outbound::Drive(cmd)] => *cmd,
            other => panic!("expected one drive command, got {:?}", other),
        }
    }

    #[test]
    fn test_evaluate_proposes_then_waits() {
        let (mut nav, _clock) = controller();
        let snap = snapshot(open(), 90.0);

        assert!(nav.tick(&snap).commands.is_empty());
        nav.handle_intent(OperatorIntent::Evaluate, &snap);
        assert_eq!(nav.state(), ControllerState::Thinking);

        let report = nav.tick(&snap);
        assert!(report.commands.is_empty());
        assert_eq!(nav.state(), ControllerState::WaitingForConfirm);

        let decision = nav.decision().unwrap();
        assert_eq!(decision.action, Action::RotateRight);
        assert_relative_eq!(decision.target_yaw, 0.0);

        // Waiting does nothing by itself
        assert!(nav.tick(&snap).commands.is_empty());
        assert_eq!(nav.state(), ControllerState::WaitingForConfirm);
    }

    #[test]
    fn test_confirm_only_from_waiting() {
        let (mut nav, _clock) = controller();
        let snap = snapshot(open(), 0.0);
        nav.handle_intent(OperatorIntent::Confirm, &snap);
        assert_eq!(nav.state(), ControllerState::Idle);
    }

    #[test]
    fn test_rotation_sends_target_only_until_timeout() {
        let (mut nav, clock) = controller();
        let snap = snapshot(open(), 90.0);
        nav.handle_intent(OperatorIntent::Evaluate, &snap);
        nav.tick(&snap);
        nav.handle_intent(OperatorIntent::Confirm, &snap);

        clock.advance_secs(0.1);
        let cmd = drive(&nav.tick(&snap));
        assert_eq!(
            cmd,
            DriveCommand {
                vx: 0.0,
                vy: 0.0,
                wz: None,
                target_yaw: Some(0.0)
            }
        );

        clock.advance_secs(1.5);
        let report = nav.tick(&snap);
        assert_eq!(report.commands, vec![Outbound::stop()]);
        assert_eq!(nav.state(), ControllerState::Thinking);
    }

    #[test]
    fn test_forward_centers_between_walls() {
        let (mut nav, clock) = controller();
        // Wall confirmed on the right and tracked long enough
        let corridor = DirectionalReading {
            front: 2000.0,
            left: 400.0,
            right: 200.0,
            back: 2000.0,
        };
        let snap = snapshot(corridor, 180.0);
        nav.tick(&snap);
        clock.advance_secs(2.0);

        nav.handle_intent(OperatorIntent::Evaluate, &snap);
        nav.tick(&snap);
        assert_eq!(nav.decision().unwrap().action, Action::Forward);
        nav.handle_intent(OperatorIntent::Confirm, &snap);

        clock.advance_secs(0.1);
        let cmd = drive(&nav.tick(&snap));
        assert_relative_eq!(cmd.vy, 0.6);
        // Closer to the right wall: steer left
        assert!(cmd.vx < 0.0);
        assert!(cmd.vx >= -0.5);
        // On target heading: inside the deadband
        assert_relative_eq!(cmd.wz.unwrap(), 0.0);
        assert_eq!(cmd.target_yaw, Some(180.0));
    }

    #[test]
    fn test_no_centering_in_open_space() {
        let (mut nav, clock) = controller();
        let wide = DirectionalReading {
            front: 2000.0,
            left: 1500.0,
            right: 300.0,
            back: 2000.0,
        };
        let snap = snapshot(wide, 170.0);
        nav.tick(&snap);
        clock.advance_secs(2.0);
        nav.handle_intent(OperatorIntent::Evaluate, &snap);
        nav.tick(&snap);
        nav.handle_intent(OperatorIntent::Confirm, &snap);

        clock.advance_secs(0.1);
        let cmd = drive(&nav.tick(&snap));
        assert_relative_eq!(cmd.vx, 0.0);
        // 10° off target: heading hold turns towards 180°
        assert!(cmd.wz.unwrap() > 0.0);
    }

    #[test]
    fn test_tracker_alert_during_execution() {
        let (mut nav, clock) = controller();
        let mut snap = snapshot(open(), 90.0);
        nav.handle_intent(OperatorIntent::Evaluate, &snap);
        nav.tick(&snap);
        nav.handle_intent(OperatorIntent::Confirm, &snap);
        clock.advance_secs(0.2);
        nav.tick(&snap);

        snap.tracker = TrackerTag::Stop;
        snap.cell = GridCoord::new(3, 2);
        clock.advance_secs(0.1);
        let report = nav.tick(&snap);

        assert_eq!(report.commands, vec![Outbound::stop()]);
        assert_eq!(nav.state(), ControllerState::Thinking);
        assert!(matches!(
            report.map_events.as_slice(),
            [MapEvent::Plotted { cell, .. }] if *cell == GridCoord::new(3, 2)
        ));
    }

    #[test]
    fn test_alert_at_confirm_ends_move_on_first_tick() {
        let (mut nav, clock) = controller();
        let mut snap = snapshot(open(), 90.0);
        snap.tracker = TrackerTag::Stop;

        nav.handle_intent(OperatorIntent::Evaluate, &snap);
        nav.tick(&snap);
        nav.handle_intent(OperatorIntent::Confirm, &snap);
        assert_eq!(nav.state(), ControllerState::Executing);

        clock.advance_secs(0.033);
        let report = nav.tick(&snap);
        assert_eq!(report.commands, vec![Outbound::stop()]);
        assert_eq!(nav.state(), ControllerState::Thinking);
    }

    #[test]
    fn test_heading_lock_enters_manual() {
        let (mut nav, _clock) = controller();
        let snap = snapshot(open(), 0.0);
        assert_eq!(nav.state(), ControllerState::Idle);

        let report = nav.handle_intent(OperatorIntent::ManualHeadingLock(Some(90.0)), &snap);
        assert!(report.commands.is_empty());
        assert_eq!(nav.state(), ControllerState::Manual);

        let cmd = drive(&nav.tick(&snap));
        assert_eq!(cmd.target_yaw, Some(90.0));
        assert_relative_eq!(cmd.vx, 0.0);
        assert_relative_eq!(cmd.vy, 0.0);
    }

    #[test]
    fn test_auto_plot_once_per_cell() {
        let (mut nav, _clock) = controller();
        // Facing North (yaw 180): front wall is the top edge, right wall East
        let readings = DirectionalReading {
            front: 300.0,
            left: 2000.0,
            right: 500.0,
            back: 100.0,
        };
        let mut snap = snapshot(readings, 180.0);
        snap.tracker = TrackerTag::Check;

        let report = nav.tick(&snap);
        let expected = CellWalls {
            top: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(
            report.map_events,
            vec![MapEvent::Plotted {
                cell: GridCoord::new(2, 2),
                walls: expected
            }]
        );
        assert_eq!(
            nav.mapper().edge(GridCoord::new(2, 2), Heading::North),
            Some(WallState::Wall)
        );
        assert_eq!(
            nav.mapper().edge(GridCoord::new(2, 2), Heading::West),
            Some(WallState::Unknown)
        );

        // Same cell: no second plot
        assert!(nav.tick(&snap).map_events.is_empty());
        // Works in any state, not only while executing
        assert_eq!(nav.state(), ControllerState::Idle);
    }

    #[test]
    fn test_clear_and_replot() {
        let (mut nav, _clock) = controller();
        let snap = snapshot(DirectionalReading::uniform(100.0), 0.0);

        nav.handle_intent(OperatorIntent::PlotWalls, &snap);
        assert_eq!(nav.mapper().edge_counts().2, 3);

        let report = nav.handle_intent(OperatorIntent::ClearWalls, &snap);
        assert_eq!(
            report.map_events,
            vec![MapEvent::Cleared {
                cell: GridCoord::new(2, 2)
            }]
        );
        assert_eq!(nav.mapper().edge_counts().2, 0);
        assert_eq!(nav.status().last_plotted, None);
    }

    #[test]
    fn test_plot_outside_maze_is_ignored() {
        let (mut nav, _clock) = controller();
        let mut snap = snapshot(DirectionalReading::uniform(100.0), 0.0);
        snap.cell = GridCoord::new(8, 0);
        assert!(nav.handle_intent(OperatorIntent::PlotWalls, &snap).map_events.is_empty());
    }

    #[test]
    fn test_stop_from_any_state_sends_one_zero() {
        let (mut nav, _clock) = controller();
        let snap = snapshot(open(), 0.0);

        nav.handle_intent(
            OperatorIntent::ManualVelocity {
                vx: None,
                vy: Some(0.6),
                wz: None,
            },
            &snap,
        );
        let report = nav.handle_intent(OperatorIntent::Stop, &snap);
        assert_eq!(report.commands, vec![Outbound::stop()]);
        assert_eq!(nav.state(), ControllerState::Idle);
        assert!(nav.tick(&snap).commands.is_empty());
    }

    #[test]
    fn test_manual_send_is_throttled() {
        let (mut nav, clock) = controller();
        let snap = snapshot(open(), 0.0);

        nav.handle_intent(
            OperatorIntent::ManualVelocity {
                vx: Some(0.6),
                vy: None,
                wz: None,
            },
            &snap,
        );
        nav.handle_intent(OperatorIntent::ManualHeadingLock(Some(90.0)), &snap);

        let cmd = drive(&nav.tick(&snap));
        assert_eq!(
            cmd,
            DriveCommand {
                vx: 0.6,
                vy: 0.0,
                wz: Some(0.0),
                target_yaw: Some(90.0)
            }
        );

        clock.advance(Duration::from_millis(50));
        assert!(nav.tick(&snap).commands.is_empty());

        clock.advance(Duration::from_millis(50));
        nav.handle_intent(OperatorIntent::ManualRelease, &snap);
        let cmd = drive(&nav.tick(&snap));
        assert_relative_eq!(cmd.vx, 0.0);
    }

    #[test]
    fn test_gain_change_emits_tune_once() {
        let (mut nav, _clock) = controller();
        let snap = snapshot(open(), 0.0);

        let report = nav.handle_intent(
            OperatorIntent::AdjustHeadingGains {
                kp: 0.005,
                ki: 0.0,
                kd: 0.0,
            },
            &snap,
        );
        match report.commands.as_slice() {
            [Outbound::HeadingTune(g)] => {
                assert_relative_eq!(g.kp, 0.030, epsilon = 1e-6);
                assert_relative_eq!(g.deadband, 2.0);
            }
            other => panic!("expected tune, got {:?}", other),
        }

        // Already at zero: no change, nothing sent
        let report = nav.handle_intent(
            OperatorIntent::AdjustHeadingGains {
                kp: 0.0,
                ki: -0.001,
                kd: 0.0,
            },
            &snap,
        );
        assert!(report.commands.is_empty());
    }

    #[test]
    fn test_save_map_writes_mapper_dialect() {
        let (mut nav, _clock) = controller();
        let snap = snapshot(DirectionalReading::uniform(100.0), 0.0);
        nav.handle_intent(OperatorIntent::PlotWalls, &snap);

        let dir = tempfile::tempdir().unwrap();
        let h = dir.path().join("map_horizontal.csv");
        let v = dir.path().join("map_vertical.csv");
        nav.save_map(&h, &v).unwrap();

        let loaded = marga_map::io::load_grid(&h, &v, 8, 8, GridDialect::Mapper).unwrap();
        assert_eq!(&loaded, nav.mapper());
    }
}
