use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::capture::CaptureState;
use crate::engine::EngineState;

/// Snapshot of the coordinator's state for status queries
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    /// Capture session state
    pub capture_state: CaptureState,

    /// Engine handle state
    pub engine_state: EngineState,

    /// Seconds of audio written for the active session
    pub elapsed_seconds: f64,

    /// When the active session started, if one is open
    pub started_at: Option<DateTime<Utc>>,

    /// Whether a finalized artifact is retained (playback / retry possible)
    pub has_artifact: bool,

    /// Whether playback currently holds the audio device
    pub playback_active: bool,
}
