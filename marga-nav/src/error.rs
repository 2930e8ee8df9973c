//! Error types for MargaNav

use thiserror::Error;

/// MargaNav error type
#[derive(Error, Debug)]
pub enum MargaError {
    #[error("Connection failed: {0}")]
    Connection(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Map error: {0}")]
    Map(#[from] marga_map::MapIoError),

    #[error("Plan error: {0}")]
    Plan(String),
}

impl From<toml::de::Error> for MargaError {
    fn from(e: toml::de::Error) -> Self {
        MargaError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for MargaError {
    fn from(e: serde_json::Error) -> Self {
        MargaError::Protocol(e.to_string())
    }
}

impl From<marga_map::CompileError> for MargaError {
    fn from(e: marga_map::CompileError) -> Self {
        MargaError::Plan(e.to_string())
    }
}

impl From<crate::playback::StepperError> for MargaError {
    fn from(e: crate::playback::StepperError) -> Self {
        MargaError::Plan(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MargaError>;
