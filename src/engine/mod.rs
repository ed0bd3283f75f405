//! On-device speech inference wrapper
//!
//! This module owns the one expensive, non-shareable native inference
//! context. The `EngineHandle` serializes initialize/release above the
//! native layer (concurrent init/release is undefined behavior in the
//! wrapped engine) and bounds every transcription call with a wall-clock
//! timeout.

pub mod backend;
pub mod handle;
pub mod types;

#[cfg(feature = "whisper")]
pub mod whisper;

pub use backend::{EngineBackend, EngineBackendFactory, EngineContext};
pub use handle::{EngineHandle, EngineState, DEFAULT_TRANSCRIBE_TIMEOUT};
pub use types::{
    EngineInitOptions, RawSegment, RawTranscript, Segment, TranscriptionRequest,
    TranscriptionResult,
};
