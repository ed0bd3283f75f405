//! Recording session orchestration
//!
//! This module provides the `SessionCoordinator` abstraction that manages:
//! - Capture session lifecycle (begin/pause/resume/end)
//! - Hand-off of finalized artifacts to the inference engine
//! - Artifact retention and retry on transcription failure
//! - Segment → transcript-item correlation
//! - Audio-device exclusivity between capture and playback

pub mod config;
pub mod coordinator;
pub mod stats;
pub mod transcript;

pub use config::SessionConfig;
pub use coordinator::{SessionCoordinator, SessionOutcome};
pub use stats::SessionStats;
pub use transcript::{items_from_result, toggle_highlight, TranscriptItem};
