//! Artifact playback
//!
//! Mutually exclusive with active capture: the session coordinator refuses
//! to start playback while a capture session holds the audio device.

pub mod controller;
pub mod sink;

pub use controller::{CompletionCallback, PlaybackController};
pub use sink::{PlaybackSink, WavClockSink};
