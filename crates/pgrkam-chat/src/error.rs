//! Error types for pgrkam-chat

use thiserror::Error;

/// Result type alias using pgrkam-chat Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from opening scoped storage
#[derive(Error, Debug)]
pub enum Error {
    /// Scoped storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Stored state was not valid JSON
    #[error("Storage format error: {0}")]
    StorageFormat(#[from] serde_json::Error),
}

/// Failures reported by a speech recognizer
#[derive(Error, Debug)]
pub enum SpeechError {
    /// Capture is already running
    #[error("Recognition has already started")]
    AlreadyStarted,

    /// The recognizer refused to start
    #[error("{0}")]
    Start(String),

    /// The recognizer could not be stopped
    #[error("{0}")]
    Stop(String),

    /// Spawning or talking to the transcriber process failed
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
