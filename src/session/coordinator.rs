use std::sync::Arc;

use tracing::{error, info, warn};

use super::config::SessionConfig;
use super::stats::SessionStats;
use super::transcript::{items_from_result, TranscriptItem};
use crate::capture::{ArtifactRef, CaptureController, CaptureState};
use crate::engine::{EngineHandle, TranscriptionRequest, TranscriptionResult};
use crate::error::{CaptureError, PlaybackError, SessionError};
use crate::playback::PlaybackController;

/// Everything a finished session produces
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// The finalized audio artifact
    pub artifact: ArtifactRef,
    /// The raw engine result
    pub result: TranscriptionResult,
    /// Transcript items derived from the result segments
    pub items: Vec<TranscriptItem>,
}

/// Composes capture, engine and playback into one recording workflow
///
/// Sequences "stop capture → transcribe → report result" and enforces the
/// audio-device exclusivity between capture and playback. On any
/// transcription failure the artifact is retained so the caller can retry
/// without re-recording.
pub struct SessionCoordinator {
    capture: CaptureController,
    engine: Arc<EngineHandle>,
    playback: PlaybackController,
    config: SessionConfig,
}

impl SessionCoordinator {
    pub fn new(
        capture: CaptureController,
        engine: Arc<EngineHandle>,
        playback: PlaybackController,
        config: SessionConfig,
    ) -> Self {
        Self {
            capture,
            engine,
            playback,
            config,
        }
    }

    /// Start a new capture session
    ///
    /// The audio device must be free: begin fails while playback is live.
    pub async fn begin_session(&self) -> Result<(), SessionError> {
        if self.playback.is_active().await {
            return Err(CaptureError::Device(
                "audio device is busy with playback".to_string(),
            )
            .into());
        }

        self.capture.start().await?;
        info!("Session started");
        Ok(())
    }

    /// Begin a session with an explicit capture backend (tests, batch runs)
    pub async fn begin_session_with(
        &self,
        backend: Box<dyn crate::capture::CaptureBackend>,
    ) -> Result<(), SessionError> {
        if self.playback.is_active().await {
            return Err(CaptureError::Device(
                "audio device is busy with playback".to_string(),
            )
            .into());
        }

        self.capture.start_with(backend).await?;
        info!("Session started");
        Ok(())
    }

    /// Pause the active capture session
    pub async fn pause(&self) -> Result<(), SessionError> {
        Ok(self.capture.pause().await?)
    }

    /// Resume a paused capture session
    pub async fn resume(&self) -> Result<(), SessionError> {
        Ok(self.capture.resume().await?)
    }

    /// Stop capture and transcribe the finalized artifact
    ///
    /// If stopping fails no transcription is attempted and the error
    /// propagates. Transcription failures surface distinctly per kind
    /// (timeout, empty result, engine) and never discard the artifact.
    pub async fn end_session(&self) -> Result<SessionOutcome, SessionError> {
        let artifact = self.capture.stop().await?;
        info!(
            "Session capture finished: {} ({:.1}s), transcribing",
            artifact.path.display(),
            artifact.duration_seconds
        );

        self.transcribe_artifact(artifact).await
    }

    /// Re-run transcription on the retained artifact without re-recording
    pub async fn retry_transcription(&self) -> Result<SessionOutcome, SessionError> {
        let artifact = self
            .capture
            .last_artifact()
            .await
            .ok_or(SessionError::NoArtifact)?;
        info!(
            "Retrying transcription of {}",
            artifact.path.display()
        );

        self.transcribe_artifact(artifact).await
    }

    async fn transcribe_artifact(
        &self,
        artifact: ArtifactRef,
    ) -> Result<SessionOutcome, SessionError> {
        let request = TranscriptionRequest {
            audio_path: artifact.path.clone(),
            language: self.config.language.clone(),
            word_threshold: self.config.word_threshold,
            max_context_tokens: self.config.max_context_tokens,
            max_segment_length: self.config.max_segment_length,
        };

        match self.engine.transcribe(&request).await {
            Ok(result) => {
                let items = items_from_result(&result);
                info!(
                    "Transcription complete: {} items, {} chars",
                    items.len(),
                    result.full_text.len()
                );
                Ok(SessionOutcome {
                    artifact,
                    result,
                    items,
                })
            }
            Err(e) => {
                // Artifact stays on disk for retry or manual playback
                error!(
                    "Transcription failed ({}); artifact retained at {}",
                    e,
                    artifact.path.display()
                );
                Err(e.into())
            }
        }
    }

    /// Play back the retained artifact
    ///
    /// Refused while a capture session holds the audio device.
    pub async fn play_artifact(&self) -> Result<(), SessionError> {
        match self.capture.state().await {
            CaptureState::Recording | CaptureState::Paused => {
                warn!("Playback refused: capture session is active");
                return Err(PlaybackError::CaptureActive.into());
            }
            CaptureState::Idle | CaptureState::Stopped => {}
        }

        let artifact = self
            .capture
            .last_artifact()
            .await
            .ok_or(SessionError::NoArtifact)?;

        self.playback.play(&artifact.path).await?;
        Ok(())
    }

    /// Stop playback; no-op when nothing is playing
    pub async fn stop_playback(&self) {
        self.playback.stop().await;
    }

    /// Snapshot of capture/engine/playback state
    pub async fn stats(&self) -> SessionStats {
        SessionStats {
            capture_state: self.capture.state().await,
            engine_state: self.engine.state().await,
            elapsed_seconds: self.capture.elapsed_seconds().await,
            started_at: self.capture.started_at().await,
            has_artifact: self.capture.last_artifact().await.is_some(),
            playback_active: self.playback.is_active().await,
        }
    }

    /// The most recently finalized artifact, if any
    pub async fn last_artifact(&self) -> Option<ArtifactRef> {
        self.capture.last_artifact().await
    }

    /// The engine handle (for explicit initialize/release at startup/shutdown)
    pub fn engine(&self) -> &Arc<EngineHandle> {
        &self.engine
    }

    /// Release engine and playback resources
    ///
    /// Safe on every exit path; duplicate calls are no-ops.
    pub async fn shutdown(&self) {
        self.playback.stop().await;
        self.engine.release().await;
    }
}
