//! Microphone/file capture and WAV artifact production
//!
//! The controller owns the capture session state machine
//! (Idle → Recording ⇄ Paused → Stopped) and writes incoming frames to a
//! single 16kHz mono 16-bit PCM WAV artifact, the format the inference
//! engine requires.

pub mod artifact;
pub mod backend;
pub mod controller;
pub mod file;

pub use artifact::{ArtifactRef, ArtifactWriter};
pub use backend::{
    AudioFrame, CaptureBackend, CaptureBackendConfig, CaptureBackendFactory, CaptureSource,
};
pub use controller::{CaptureConfig, CaptureController, CaptureState};
pub use file::{AudioFile, FileCaptureBackend};
