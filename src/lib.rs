pub mod api;
pub mod capture;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod playback;
pub mod session;
pub mod storage;

pub use api::{ApiClient, AuthResponse};
pub use capture::{
    ArtifactRef, AudioFile, AudioFrame, CaptureBackend, CaptureBackendConfig,
    CaptureBackendFactory, CaptureConfig, CaptureController, CaptureSource, CaptureState,
};
pub use config::Config;
pub use engine::{
    EngineBackend, EngineBackendFactory, EngineContext, EngineHandle, EngineInitOptions,
    EngineState, Segment, TranscriptionRequest, TranscriptionResult, DEFAULT_TRANSCRIBE_TIMEOUT,
};
pub use error::{ApiError, CaptureError, EngineError, PlaybackError, SessionError, StorageError};
pub use http::{create_router, AppState};
pub use playback::{PlaybackController, PlaybackSink, WavClockSink};
pub use session::{
    SessionConfig, SessionCoordinator, SessionOutcome, SessionStats, TranscriptItem,
};
pub use storage::{KvStore, Meeting, MeetingPatch, Theme, User};
