use std::path::PathBuf;

use serde::Serialize;

/// Options for bringing up a native engine context
#[derive(Debug, Clone)]
pub struct EngineInitOptions {
    /// Path to the model file on disk
    pub model_path: PathBuf,
    /// Offload inference to the GPU where the build supports it
    pub use_gpu: bool,
    /// Use the CoreML encoder on Apple platforms
    pub use_core_ml: bool,
}

/// A transcription request; immutable once submitted
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Path to the 16kHz mono WAV artifact
    pub audio_path: PathBuf,
    /// Language code ("en", "zh", ...); None lets the engine detect
    pub language: Option<String>,
    /// Word timestamp probability threshold
    pub word_threshold: f32,
    /// Maximum context tokens (-1 = engine maximum)
    pub max_context_tokens: i32,
    /// Maximum segment length in characters (0 = unlimited)
    pub max_segment_length: i32,
}

impl TranscriptionRequest {
    pub fn new(audio_path: PathBuf) -> Self {
        Self {
            audio_path,
            language: None,
            word_threshold: 0.01,
            max_context_tokens: -1,
            max_segment_length: 0,
        }
    }
}

/// A time-stamped sub-span of transcribed text
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub text: String,
}

/// Result of a transcription call; immutable after creation
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionResult {
    /// The full transcribed text
    pub full_text: String,
    /// Ordered segments, non-decreasing in start_seconds
    pub segments: Vec<Segment>,
}

/// Raw segment as the native engine reports it (milliseconds)
#[derive(Debug, Clone)]
pub struct RawSegment {
    pub start_ms: i64,
    pub end_ms: i64,
    pub text: String,
}

/// Raw engine output before boundary conversion
#[derive(Debug, Clone)]
pub struct RawTranscript {
    pub text: String,
    pub segments: Vec<RawSegment>,
}

impl TranscriptionResult {
    /// Convert engine milliseconds to seconds at the boundary
    pub fn from_raw(raw: RawTranscript) -> Self {
        let segments = raw
            .segments
            .into_iter()
            .map(|s| Segment {
                start_seconds: s.start_ms as f64 / 1000.0,
                end_seconds: s.end_ms as f64 / 1000.0,
                text: s.text,
            })
            .collect();

        Self {
            full_text: raw.text,
            segments,
        }
    }
}
