//! Ingest thread: bridge messages into shared state.

use std::sync::Arc;

use crate::client::{BridgeMessage, BridgeReader};
use crate::error::MargaError;
use crate::shared::{SharedNavigationState, TrackerTag};

/// Merge one bridge message into shared state.
pub fn apply_message(shared: &SharedNavigationState, message: &BridgeMessage) {
    match message {
        BridgeMessage::Range(frame) => shared.apply_range(frame),
        BridgeMessage::Yaw { yaw } => shared.apply_yaw(*yaw),
        BridgeMessage::Position { grid_x, grid_y } => shared.apply_position(*grid_x, *grid_y),
        BridgeMessage::Tracker { state } => {
            let tag = TrackerTag::from_label(state);
            tracing::debug!("Tracker: {} ({:?})", state, tag);
            shared.apply_tracker(tag);
        }
    }
}

/// Ingest thread state and logic.
pub struct IngestThread {
    shared_state: Arc<SharedNavigationState>,
    reader: BridgeReader,
    dropped: u64,
}

impl IngestThread {
    /// Create a new ingest thread.
    pub fn new(shared_state: Arc<SharedNavigationState>, reader: BridgeReader) -> Self {
        Self {
            shared_state,
            reader,
            dropped: 0,
        }
    }

    /// Run the ingest loop until shutdown or disconnect.
    pub fn run(&mut self) {
        tracing::info!("Ingest thread started");

        loop {
            // Check for shutdown
            if self.shared_state.should_shutdown() {
                tracing::info!("Ingest thread shutting down");
                break;
            }

            match self.reader.recv() {
                Ok(Some(message)) => apply_message(&self.shared_state, &message),
                Ok(None) => {
                    // Read timeout, loop to check shutdown
                }
                Err(MargaError::Protocol(e)) => {
                    self.dropped += 1;
                    tracing::warn!("Dropped bridge message ({} so far): {}", self.dropped, e);
                }
                Err(e) => {
                    tracing::error!("Bridge connection lost: {}", e);
                    break;
                }
            }
        }

        tracing::info!("Ingest thread exited");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SensingConfig;
    use crate::sensing::RangeFrame;
    use marga_map::GridCoord;

    #[test]
    fn test_apply_messages() {
        let shared = SharedNavigationState::new(&SensingConfig::default());

        apply_message(&shared, &BridgeMessage::Yaw { yaw: 450.0 });
        apply_message(
            &shared,
            &BridgeMessage::Position {
                grid_x: Some(5),
                grid_y: None,
            },
        );
        apply_message(
            &shared,
            &BridgeMessage::Tracker {
                state: "STOP".into(),
            },
        );
        apply_message(&shared, &BridgeMessage::Range(RangeFrame::default()));

        let snap = shared.snapshot();
        assert_eq!(snap.yaw, 90.0);
        assert_eq!(snap.cell, GridCoord::new(5, 0));
        assert_eq!(snap.tracker, TrackerTag::Stop);
        assert_eq!(snap.readings.front, 2000.0);
        assert_eq!(shared.range_frames(), 1);
    }
}
