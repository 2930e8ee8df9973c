//! Configuration loading for MargaNav

use crate::error::{MargaError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "marga.toml";

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MargaConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub maze: MazeConfig,
    #[serde(default)]
    pub sensing: SensingConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub control: ControlConfig,
}

/// Bridge connection settings
#[derive(Clone, Debug, Deserialize)]
pub struct ConnectionConfig {
    /// Bridge IP address (default: 127.0.0.1)
    #[serde(default = "default_bridge_ip")]
    pub bridge_ip: String,

    /// TCP port number (default: 5556)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Connection timeout in milliseconds (default: 5000)
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// Maze size and grid file locations
#[derive(Clone, Debug, Deserialize)]
pub struct MazeConfig {
    /// Width in cells (default: 8)
    #[serde(default = "default_maze_size")]
    pub width: usize,

    /// Height in cells (default: 8)
    #[serde(default = "default_maze_size")]
    pub height: usize,

    /// Authored horizontal edges (solver input)
    #[serde(default = "default_horizontal_walls")]
    pub horizontal_walls: PathBuf,

    /// Authored vertical edges (solver input)
    #[serde(default = "default_vertical_walls")]
    pub vertical_walls: PathBuf,

    /// Mapper output, horizontal edges
    #[serde(default = "default_mapped_horizontal")]
    pub mapped_horizontal: PathBuf,

    /// Mapper output, vertical edges
    #[serde(default = "default_mapped_vertical")]
    pub mapped_vertical: PathBuf,
}

/// Range sensor smoothing and wall confirmation
#[derive(Clone, Debug, Deserialize)]
pub struct SensingConfig {
    /// Exponential smoothing coefficient in (0, 1) (default: 0.4)
    #[serde(default = "default_smoothing_alpha")]
    pub smoothing_alpha: f32,

    /// Distance below which a wall is suspected, mm (default: 900)
    #[serde(default = "default_wall_threshold")]
    pub wall_threshold_mm: f32,

    /// Time a reading must stay below threshold to confirm, s (default: 1.5)
    #[serde(default = "default_wall_dwell")]
    pub wall_dwell_secs: f32,

    /// Sentinel used for missing readings, mm (default: 2000)
    #[serde(default = "default_far_distance")]
    pub far_distance_mm: f32,

    /// Operator calibration step for side sensors, mm (default: 10)
    #[serde(default = "default_calibration_step")]
    pub calibration_step_mm: f32,
}

/// Wall-following policy distances
#[derive(Clone, Debug, Deserialize)]
pub struct PolicyConfig {
    /// Front distance that forces a stop, mm (default: 250)
    #[serde(default = "default_emergency_stop")]
    pub emergency_stop_mm: f32,

    /// Front/left/right distance that forces a reverse, mm (default: 150)
    #[serde(default = "default_boxed_in")]
    pub boxed_in_mm: f32,
}

/// PID gains with output clamp
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PidConfig {
    pub kp: f32,
    #[serde(default)]
    pub ki: f32,
    #[serde(default)]
    pub kd: f32,
    pub max_output: f32,
}

/// Heading-hold PID with operator tuning steps
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct HeadingPidConfig {
    #[serde(default = "default_heading_kp")]
    pub kp: f32,
    #[serde(default)]
    pub ki: f32,
    #[serde(default = "default_heading_kd")]
    pub kd: f32,
    #[serde(default = "default_heading_max")]
    pub max_output: f32,
    /// Heading error ignored by the hold loop, degrees (default: 2.0)
    #[serde(default = "default_deadband")]
    pub deadband_deg: f32,
    #[serde(default = "default_kp_step")]
    pub kp_step: f32,
    #[serde(default = "default_ki_step")]
    pub ki_step: f32,
    #[serde(default = "default_kd_step")]
    pub kd_step: f32,
}

/// Decision loop timing and drive settings
#[derive(Clone, Debug, Deserialize)]
pub struct ControlConfig {
    /// Navigation loop rate (default: 30)
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,

    /// Time after which an executing move counts as done, s (default: 1.5)
    #[serde(default = "default_execution_timeout")]
    pub execution_timeout_secs: f32,

    /// Forward/backward speed while executing (default: 0.6)
    #[serde(default = "default_speed")]
    pub drive_speed: f32,

    /// Speed applied by manual drive keys (default: 0.6)
    #[serde(default = "default_speed")]
    pub manual_speed: f32,

    /// Minimum interval between manual commands, ms (default: 100)
    #[serde(default = "default_manual_interval")]
    pub manual_send_interval_ms: u64,

    /// Side distance below which centering is trusted, mm (default: 1000)
    #[serde(default = "default_lateral_trust")]
    pub lateral_trust_mm: f32,

    /// Status log period, s (default: 3)
    #[serde(default = "default_status_interval")]
    pub status_interval_secs: u64,

    #[serde(default = "default_center_pid")]
    pub center_pid: PidConfig,

    #[serde(default)]
    pub heading_pid: HeadingPidConfig,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            bridge_ip: default_bridge_ip(),
            port: default_port(),
            timeout_ms: default_timeout(),
        }
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: default_maze_size(),
            height: default_maze_size(),
            horizontal_walls: default_horizontal_walls(),
            vertical_walls: default_vertical_walls(),
            mapped_horizontal: default_mapped_horizontal(),
            mapped_vertical: default_mapped_vertical(),
        }
    }
}

impl Default for SensingConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: default_smoothing_alpha(),
            wall_threshold_mm: default_wall_threshold(),
            wall_dwell_secs: default_wall_dwell(),
            far_distance_mm: default_far_distance(),
            calibration_step_mm: default_calibration_step(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            emergency_stop_mm: default_emergency_stop(),
            boxed_in_mm: default_boxed_in(),
        }
    }
}

impl Default for HeadingPidConfig {
    fn default() -> Self {
        Self {
            kp: default_heading_kp(),
            ki: 0.0,
            kd: default_heading_kd(),
            max_output: default_heading_max(),
            deadband_deg: default_deadband(),
            kp_step: default_kp_step(),
            ki_step: default_ki_step(),
            kd_step: default_kd_step(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
            execution_timeout_secs: default_execution_timeout(),
            drive_speed: default_speed(),
            manual_speed: default_speed(),
            manual_send_interval_ms: default_manual_interval(),
            lateral_trust_mm: default_lateral_trust(),
            status_interval_secs: default_status_interval(),
            center_pid: default_center_pid(),
            heading_pid: HeadingPidConfig::default(),
        }
    }
}

// Default value functions
fn default_bridge_ip() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5556
}
fn default_timeout() -> u64 {
    5000
}
fn default_maze_size() -> usize {
    8
}
fn default_horizontal_walls() -> PathBuf {
    PathBuf::from("horizontal_walls.csv")
}
fn default_vertical_walls() -> PathBuf {
    PathBuf::from("vertical_walls.csv")
}
fn default_mapped_horizontal() -> PathBuf {
    PathBuf::from("map_horizontal.csv")
}
fn default_mapped_vertical() -> PathBuf {
    PathBuf::from("map_vertical.csv")
}

// Sensing defaults
fn default_smoothing_alpha() -> f32 {
    0.4
}
fn default_wall_threshold() -> f32 {
    900.0
}
fn default_wall_dwell() -> f32 {
    1.5
}
fn default_far_distance() -> f32 {
    2000.0
}
fn default_calibration_step() -> f32 {
    10.0
}

// Policy defaults
fn default_emergency_stop() -> f32 {
    250.0
}
fn default_boxed_in() -> f32 {
    150.0
}

// Control defaults
fn default_tick_hz() -> u32 {
    30
}
fn default_execution_timeout() -> f32 {
    1.5
}
fn default_speed() -> f32 {
    0.6
}
fn default_manual_interval() -> u64 {
    100
}
fn default_lateral_trust() -> f32 {
    1000.0
}
fn default_status_interval() -> u64 {
    3
}
fn default_center_pid() -> PidConfig {
    PidConfig {
        kp: 0.0015,
        ki: 0.0,
        kd: 0.0005,
        max_output: 0.5,
    }
}
fn default_heading_kp() -> f32 {
    0.025
}
fn default_heading_kd() -> f32 {
    0.030
}
fn default_heading_max() -> f32 {
    1.0
}
fn default_deadband() -> f32 {
    2.0
}
fn default_kp_step() -> f32 {
    0.005
}
fn default_ki_step() -> f32 {
    0.001
}
fn default_kd_step() -> f32 {
    0.005
}

impl MargaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MargaError::Config(format!("Failed to read config file: {}", e)))?;
        let config: MargaConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else `marga.toml` if present, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            tracing::info!("Loading configuration from {:?}", path);
            return Self::load(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            tracing::info!("Loading configuration from {}", DEFAULT_CONFIG_FILE);
            Self::load(fallback)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> Result<()> {
        let alpha = self.sensing.smoothing_alpha;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(MargaError::Config(format!(
                "smoothing_alpha must be in (0, 1), got {}",
                alpha
            )));
        }
        if self.control.tick_hz == 0 {
            return Err(MargaError::Config("tick_hz must be positive".into()));
        }
        if self.maze.width == 0 || self.maze.height == 0 {
            return Err(MargaError::Config(format!(
                "maze must be at least 1x1, got {}x{}",
                self.maze.width, self.maze.height
            )));
        }
        Ok(())
    }

    /// Get the full address string for connection
    pub fn address(&self) -> String {
        format!("{}:{}", self.connection.bridge_ip, self.connection.port)
    }

    /// Navigation loop period
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.control.tick_hz as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = MargaConfig::default();
        assert_eq!(config.address(), "127.0.0.1:5556");
        assert_eq!(config.maze.width, 8);
        assert_relative_eq!(config.sensing.wall_threshold_mm, 900.0);
        assert_relative_eq!(config.control.center_pid.kp, 0.0015);
        assert_relative_eq!(config.control.heading_pid.kd, 0.030);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: MargaConfig = toml::from_str(
            r#"
            [connection]
            bridge_ip = "10.0.0.7"

            [control.center_pid]
            kp = 0.002
            max_output = 0.4
            "#,
        )
        .unwrap();

        assert_eq!(config.address(), "10.0.0.7:5556");
        assert_relative_eq!(config.control.center_pid.kp, 0.002);
        assert_relative_eq!(config.control.center_pid.kd, 0.0);
        assert_relative_eq!(config.control.heading_pid.kp, 0.025);
        assert_relative_eq!(config.sensing.smoothing_alpha, 0.4);
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marga.toml");
        std::fs::write(&path, "[sensing]\nsmoothing_alpha = 1.0\n").unwrap();

        assert!(matches!(
            MargaConfig::load(&path),
            Err(MargaError::Config(_))
        ));
    }

    #[test]
    fn test_tick_interval() {
        let config = MargaConfig::default();
        assert_eq!(config.tick_interval().as_millis(), 33);
    }
}
