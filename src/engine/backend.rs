use std::path::Path;
use std::sync::Arc;

use super::types::{EngineInitOptions, RawTranscript, TranscriptionRequest};
use crate::error::EngineError;

/// A live native inference context
///
/// Expensive to build, reused across many transcription calls, torn down
/// exactly once. Implementations must tolerate `release` being the last call
/// ever made on the context.
#[async_trait::async_trait]
pub trait EngineContext: Send + Sync {
    /// Run inference over the audio file at `audio_path`
    ///
    /// Timestamps in the returned transcript are in milliseconds; the handle
    /// converts to seconds at the boundary.
    async fn transcribe(&self, request: &TranscriptionRequest) -> Result<RawTranscript, EngineError>;

    /// Tear down the native context
    async fn release(&self) -> Result<(), EngineError>;
}

/// Builds native engine contexts
#[async_trait::async_trait]
pub trait EngineBackend: Send + Sync {
    async fn init(&self, options: &EngineInitOptions) -> Result<Arc<dyn EngineContext>, EngineError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Engine backend factory
pub struct EngineBackendFactory;

impl EngineBackendFactory {
    /// Create the inference backend compiled into this build
    pub fn create() -> Result<Box<dyn EngineBackend>, EngineError> {
        #[cfg(feature = "whisper")]
        {
            Ok(Box::new(super::whisper::WhisperBackend::new()))
        }

        #[cfg(not(feature = "whisper"))]
        {
            Err(EngineError::InitFailed(
                "no inference backend compiled in (rebuild with --features whisper)".to_string(),
            ))
        }
    }
}

/// Validate that a model file exists before handing it to a backend
pub fn check_model_path(path: &Path) -> Result<(), EngineError> {
    if !path.is_file() {
        return Err(EngineError::ModelNotFound(path.to_path_buf()));
    }
    Ok(())
}
