// src/error.rs
use thiserror::Error;

/// Errors raised by the tracking core and its collaborators.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Camera could not be opened, streamed or read
    #[error("Camera error: {0}")]
    Camera(String),

    /// Landmark engine failed to start or reported a failure
    #[error("Landmark engine error: {0}")]
    Engine(String),

    /// Landmark engine sent something that is not a valid response
    #[error("Malformed engine response: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
