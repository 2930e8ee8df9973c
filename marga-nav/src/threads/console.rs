//! Console thread: operator input lines to intents.

use std::io::BufRead;

use crossbeam_channel::Sender;

use crate::config::MargaConfig;
use crate::intent::{IntentParser, OperatorIntent};

/// Reads operator lines and forwards parsed intents.
pub struct ConsoleThread {
    parser: IntentParser,
    intents: Sender<OperatorIntent>,
}

impl ConsoleThread {
    pub fn new(config: &MargaConfig, intents: Sender<OperatorIntent>) -> Self {
        Self {
            parser: IntentParser::new(config),
            intents,
        }
    }

    /// Forward intents until input ends, a quit is read or the receiver is
    /// gone.
    pub fn run<R: BufRead>(&self, input: R) {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Console read failed: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let Some(intent) = self.parser.parse(&line) else {
                tracing::warn!("Unknown command: {:?}", line.trim());
                continue;
            };
            if self.intents.send(intent).is_err() {
                break;
            }
            if intent == OperatorIntent::Quit {
                break;
            }
        }
        tracing::debug!("Console input closed");
    }
}
