//! Bridge client: inbound sensor messages and outbound robot commands.
//!
//! Both directions use the same length-prefixed JSON framing:
//!
//! ```text
//! ┌──────────────────┬──────────────────────────┐
//! │ Length (4 bytes) │ Payload (variable)       │
//! │ Big-endian u32   │ JSON                     │
//! └──────────────────┴──────────────────────────┘
//! ```
//!
//! Publishing is fire-and-forget. A failed write is logged and otherwise
//! invisible to the caller.

use crate::control::HeadingGains;
use crate::error::{MargaError, Result};
use crate::sensing::RangeFrame;
use marga_map::PathCommand;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

/// Largest accepted frame payload (1MB)
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Initial capacity for the frame read buffer
const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Continuous drive command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveCommand {
    /// Lateral velocity (positive = right)
    pub vx: f32,
    /// Longitudinal velocity (positive = forward)
    pub vy: f32,
    /// Angular velocity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wz: Option<f32>,
    /// Heading the robot should hold, degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_yaw: Option<f32>,
}

/// A command published to the robot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    /// Velocity / heading setpoint
    Drive(DriveCommand),
    /// One discrete replay step
    Step { command: PathCommand },
    /// New heading-hold gains
    HeadingTune(HeadingGains),
}

impl Outbound {
    /// All-zero drive command.
    pub fn stop() -> Self {
        Outbound::Drive(DriveCommand {
            vx: 0.0,
            vy: 0.0,
            wz: Some(0.0),
            target_yaw: None,
        })
    }

    /// True if this is a zero-velocity drive command.
    pub fn is_stop(&self) -> bool {
        matches!(
            self,
            Outbound::Drive(DriveCommand { vx, vy, wz, .. })
                if *vx == 0.0 && *vy == 0.0 && wz.unwrap_or(0.0) == 0.0
        )
    }
}

/// Message received from the bridge, tagged by `topic`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "lowercase")]
pub enum BridgeMessage {
    /// Four range distances in mm, each optional
    Range(RangeFrame),
    /// Robot yaw in degrees
    Yaw { yaw: f32 },
    /// Grid cell from the position tracker; a missing axis is unchanged
    Position {
        #[serde(default)]
        grid_x: Option<i32>,
        #[serde(default)]
        grid_y: Option<i32>,
    },
    /// Tracker verification state (`"STOP"`, `"CHECK"`, ...)
    Tracker { state: String },
}

/// Capability to publish commands.
pub trait CommandSink: Send {
    /// Publish one command without waiting for delivery.
    fn send(&mut self, command: &Outbound);
}

impl<S: CommandSink + ?Sized> CommandSink for Box<S> {
    fn send(&mut self, command: &Outbound) {
        (**self).send(command)
    }
}

/// Serialize a message with its length prefix.
pub fn encode_frame<T: Serialize>(message: &T) -> Result<Vec<u8>> {
    let payload = serde_json::to_vec(message)?;
    if payload.len() > MAX_FRAME_LEN {
        return Err(MargaError::Protocol(format!(
            "Message too large: {} bytes",
            payload.len()
        )));
    }
    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Write one framed message.
pub fn write_message<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<()> {
    let frame = encode_frame(message)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Read one framed message.
///
/// Returns `Ok(None)` on a read timeout. A payload that is not a valid
/// [`BridgeMessage`] is a `Protocol` error; the stream stays aligned on the
/// next frame.
pub fn read_message<R: Read>(reader: &mut R, buffer: &mut Vec<u8>) -> Result<Option<BridgeMessage>> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return Ok(None),
        Err(e) if e.kind() == std::io::ErrorKind::TimedOut => return Ok(None),
        Err(e) => return Err(MargaError::Connection(e)),
    }

    let len = u32::from_be_bytes(len_buf) as usize;

    // Sanity check on length
    if len > MAX_FRAME_LEN {
        return Err(MargaError::Protocol(format!("Message too large: {} bytes", len)));
    }

    buffer.clear();
    buffer.resize(len, 0);
    reader.read_exact(buffer)?;

    serde_json::from_slice(buffer)
        .map(Some)
        .map_err(|e| MargaError::Protocol(format!("Malformed message: {}", e)))
}

/// TCP connection to the robot bridge.
pub struct BridgeClient {
    stream: TcpStream,
    address: String,
}

impl BridgeClient {
    /// Connect with timeout
    pub fn connect_timeout(addr: &str, timeout: Duration) -> Result<Self> {
        let sock_addr: SocketAddr = addr
            .parse()
            .map_err(|e| MargaError::Config(format!("Invalid address: {}", e)))?;
        let stream = TcpStream::connect_timeout(&sock_addr, timeout)?;
        stream.set_nodelay(true)?;

        tracing::info!("Connected to bridge at {}", addr);

        Ok(Self {
            stream,
            address: addr.to_string(),
        })
    }

    /// Open an independent reader on the same connection.
    pub fn reader(&self, read_timeout: Duration) -> Result<BridgeReader> {
        let stream = self.stream.try_clone()?;
        stream.set_read_timeout(Some(read_timeout))?;
        Ok(BridgeReader {
            stream,
            buffer: Vec::with_capacity(INITIAL_BUFFER_CAPACITY),
        })
    }
}

impl CommandSink for BridgeClient {
    fn send(&mut self, command: &Outbound) {
        if let Err(e) = write_message(&mut self.stream, command) {
            tracing::warn!("Failed to publish {:?} to {}: {}", command, self.address, e);
        }
    }
}

/// Receiving half of a [`BridgeClient`].
pub struct BridgeReader {
    stream: TcpStream,
    buffer: Vec<u8>,
}

impl BridgeReader {
    /// Receive the next message, or `None` if the read timed out.
    pub fn recv(&mut self) -> Result<Option<BridgeMessage>> {
        read_message(&mut self.stream, &mut self.buffer)
    }
}

/// Sink used when no bridge is reachable: commands are only logged.
#[derive(Debug, Default)]
pub struct OfflineSink;

impl CommandSink for OfflineSink {
    fn send(&mut self, command: &Outbound) {
        match serde_json::to_string(command) {
            Ok(json) => tracing::info!("(offline) {}", json),
            Err(e) => tracing::warn!("(offline) unserializable command {:?}: {}", command, e),
        }
    }
}

/// Sink that keeps every command, for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub sent: Vec<Outbound>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.sent)
    }
}

impl CommandSink for RecordingSink {
    fn send(&mut self, command: &Outbound) {
        self.sent.push(*command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frame(json: &str) -> Vec<u8> {
        let mut out = (json.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(json.as_bytes());
        out
    }

    #[test]
    fn test_drive_json_shape() {
        let json = serde_json::to_value(Outbound::Drive(DriveCommand {
            vx: 0.1,
            vy: 0.6,
            wz: None,
            target_yaw: Some(90.0),
        }))
        .unwrap();

        assert_eq!(json["type"], "drive");
        assert_eq!(json["target_yaw"], 90.0);
        assert!(json.get("wz").is_none());
    }

    #[test]
    fn test_step_and_tune_json_shape() {
        let step = serde_json::to_value(Outbound::Step {
            command: PathCommand::Left,
        })
        .unwrap();
        assert_eq!(step, serde_json::json!({"type": "step", "command": "LEFT"}));

        let tune = serde_json::to_value(Outbound::HeadingTune(HeadingGains {
            kp: 0.5,
            ki: 0.0,
            kd: 0.25,
            deadband: 2.0,
        }))
        .unwrap();
        assert_eq!(
            tune,
            serde_json::json!({"type": "heading_tune", "kp": 0.5, "ki": 0.0, "kd": 0.25, "db": 2.0})
        );
    }

    #[test]
    fn test_stop_command() {
        assert!(Outbound::stop().is_stop());
        assert!(
            !Outbound::Drive(DriveCommand {
                vy: 0.6,
                ..Default::default()
            })
            .is_stop()
        );
    }

    #[test]
    fn test_read_messages() {
        let mut bytes = frame(r#"{"topic":"range","F":120.5,"L":800}"#);
        bytes.extend(frame(r#"{"topic":"yaw","yaw":91.0}"#));
        bytes.extend(frame(r#"{"topic":"position","grid_y":3}"#));
        bytes.extend(frame(r#"{"topic":"tracker","state":"CHECK"}"#));

        let mut reader = Cursor::new(bytes);
        let mut buf = Vec::new();

        assert_eq!(
            read_message(&mut reader, &mut buf).unwrap(),
            Some(BridgeMessage::Range(RangeFrame {
                front: Some(120.5),
                left: Some(800.0),
                right: None,
                back: None,
            }))
        );
        assert_eq!(
            read_message(&mut reader, &mut buf).unwrap(),
            Some(BridgeMessage::Yaw { yaw: 91.0 })
        );
        assert_eq!(
            read_message(&mut reader, &mut buf).unwrap(),
            Some(BridgeMessage::Position {
                grid_x: None,
                grid_y: Some(3)
            })
        );
        assert_eq!(
            read_message(&mut reader, &mut buf).unwrap(),
            Some(BridgeMessage::Tracker {
                state: "CHECK".into()
            })
        );
        assert!(matches!(
            read_message(&mut reader, &mut buf),
            Err(MargaError::Connection(_))
        ));
    }

    #[test]
    fn test_malformed_frame_is_skipped() {
        let mut bytes = frame(r#"{"topic":"lidar"}"#);
        bytes.extend(frame(r#"{"topic":"yaw","yaw":5}"#));
        let mut reader = Cursor::new(bytes);
        let mut buf = Vec::new();

        assert!(matches!(
            read_message(&mut reader, &mut buf),
            Err(MargaError::Protocol(_))
        ));
        assert_eq!(
            read_message(&mut reader, &mut buf).unwrap(),
            Some(BridgeMessage::Yaw { yaw: 5.0 })
        );
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let mut reader = Cursor::new(((MAX_FRAME_LEN + 1) as u32).to_be_bytes().to_vec());
        assert!(matches!(
            read_message(&mut reader, &mut Vec::new()),
            Err(MargaError::Protocol(_))
        ));
    }

    #[test]
    fn test_written_frame_reads_back_as_length_prefixed_json() {
        let mut out = Vec::new();
        write_message(&mut out, &Outbound::stop()).unwrap();

        let len = u32::from_be_bytes([out[0], out[1], out[2], out[3]]) as usize;
        assert_eq!(len, out.len() - 4);
        let value: serde_json::Value = serde_json::from_slice(&out[4..]).unwrap();
        assert_eq!(value["type"], "drive");
        assert_eq!(value["wz"], 0.0);
    }
}
