use std::path::PathBuf;
use thiserror::Error;

use crate::capture::CaptureState;

/// Errors raised by the capture controller
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("a capture session is already active")]
    AlreadyActive,

    #[error("cannot {operation} while capture is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: CaptureState,
    },

    #[error("no active capture session")]
    NoActiveSession,

    #[error("audio device error: {0}")]
    Device(String),
}

/// Errors raised by the transcription engine handle
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("model file not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("engine initialization failed: {0}")]
    InitFailed(String),

    #[error("engine is not initialized")]
    NotInitialized,

    #[error("transcription timed out after {0} seconds")]
    Timeout(u64),

    #[error("transcription produced no text")]
    EmptyResult,

    #[error("engine error: {0}")]
    Engine(String),
}

impl EngineError {
    /// Whether the caller can retry the same artifact without re-recording
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Timeout(_) | EngineError::EmptyResult)
    }
}

/// Errors raised by the playback controller
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("cannot play while a capture session is recording")]
    CaptureActive,

    #[error("artifact cannot be played: {0}")]
    InvalidArtifact(String),

    #[error("playback sink error: {0}")]
    Sink(String),
}

/// Errors raised by the key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to (de)serialize stored value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised by the auth REST client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Composed error surfaced by the session coordinator
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("no artifact available to transcribe")]
    NoArtifact,
}
