use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use super::artifact::{ArtifactRef, ArtifactWriter};
use super::backend::{CaptureBackend, CaptureBackendConfig, CaptureBackendFactory, CaptureSource};
use crate::error::CaptureError;

/// Capture session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    /// No session, ready to start
    Idle,
    /// Actively recording audio
    Recording,
    /// Session open but frames are being discarded
    Paused,
    /// Session finalized, artifact available
    Stopped,
}

/// Configuration for the capture controller
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Sample rate required by the inference engine (16kHz)
    pub sample_rate: u32,
    /// Channel count (1 = mono)
    pub channels: u16,
    /// Directory where artifacts are written
    pub output_dir: PathBuf,
    /// Where audio comes from
    pub source: CaptureSource,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            output_dir: PathBuf::from("recordings"),
            source: CaptureSource::Microphone,
        }
    }
}

struct ActiveSession {
    backend: Box<dyn CaptureBackend>,
    writer_task: JoinHandle<Result<ArtifactRef, CaptureError>>,
    paused: Arc<AtomicBool>,
    samples_written: Arc<AtomicU64>,
    started_at: DateTime<Utc>,
}

struct Inner {
    state: CaptureState,
    active: Option<ActiveSession>,
    last_artifact: Option<ArtifactRef>,
}

/// Owns the capture session lifecycle and produces WAV artifacts
///
/// At most one session exists at a time. Elapsed time is derived from the
/// samples actually written, never from OS timers, so it only advances while
/// the state is Recording.
pub struct CaptureController {
    config: CaptureConfig,
    inner: Mutex<Inner>,
}

impl CaptureController {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                state: CaptureState::Idle,
                active: None,
                last_artifact: None,
            }),
        }
    }

    /// Ask the capture backend for microphone access
    ///
    /// Returns false (rather than an error) when the OS denies the prompt or
    /// no backend is available.
    pub async fn request_permission(&self) -> bool {
        let backend_config = self.backend_config();
        match CaptureBackendFactory::create(self.config.source.clone(), backend_config) {
            Ok(mut backend) => backend.request_permission().await,
            Err(e) => {
                warn!("Cannot request capture permission: {}", e);
                false
            }
        }
    }

    /// Start a new capture session using the configured source
    pub async fn start(&self) -> Result<(), CaptureError> {
        let backend =
            CaptureBackendFactory::create(self.config.source.clone(), self.backend_config())?;
        self.start_with(backend).await
    }

    /// Start a new capture session with an explicit backend
    pub async fn start_with(
        &self,
        mut backend: Box<dyn CaptureBackend>,
    ) -> Result<(), CaptureError> {
        let mut inner = self.inner.lock().await;

        match inner.state {
            CaptureState::Recording | CaptureState::Paused => {
                return Err(CaptureError::AlreadyActive)
            }
            CaptureState::Idle | CaptureState::Stopped => {}
        }

        if !backend.request_permission().await {
            return Err(CaptureError::PermissionDenied);
        }

        std::fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| CaptureError::Device(format!("failed to create output dir: {e}")))?;
        let path = self
            .config
            .output_dir
            .join(format!("capture-{}.wav", Uuid::new_v4()));

        let mut rx = backend.start().await?;
        let mut writer =
            ArtifactWriter::new(path.clone(), self.config.sample_rate, self.config.channels)?;

        let paused = Arc::new(AtomicBool::new(false));
        let samples_written = Arc::new(AtomicU64::new(0));

        let task_paused = Arc::clone(&paused);
        let task_samples = Arc::clone(&samples_written);

        let writer_task = tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                // Paused frames are discarded, so elapsed time stands still
                if task_paused.load(Ordering::SeqCst) {
                    continue;
                }
                writer.write_frame(&frame)?;
                task_samples.store(writer.sample_count(), Ordering::SeqCst);
            }
            writer.finish()
        });

        info!(
            "Capture session started: {} ({}Hz, {} ch, backend {})",
            path.display(),
            self.config.sample_rate,
            self.config.channels,
            backend.name()
        );

        inner.state = CaptureState::Recording;
        inner.active = Some(ActiveSession {
            backend,
            writer_task,
            paused,
            samples_written,
            started_at: Utc::now(),
        });

        Ok(())
    }

    /// Pause the active session; valid only while Recording
    pub async fn pause(&self) -> Result<(), CaptureError> {
        let mut inner = self.inner.lock().await;
        if inner.state != CaptureState::Recording {
            return Err(CaptureError::InvalidState {
                operation: "pause",
                state: inner.state,
            });
        }
        if let Some(active) = &inner.active {
            active.paused.store(true, Ordering::SeqCst);
        }
        inner.state = CaptureState::Paused;
        info!("Capture session paused");
        Ok(())
    }

    /// Resume a paused session; valid only while Paused
    pub async fn resume(&self) -> Result<(), CaptureError> {
        let mut inner = self.inner.lock().await;
        if inner.state != CaptureState::Paused {
            return Err(CaptureError::InvalidState {
                operation: "resume",
                state: inner.state,
            });
        }
        if let Some(active) = &inner.active {
            active.paused.store(false, Ordering::SeqCst);
        }
        inner.state = CaptureState::Recording;
        info!("Capture session resumed");
        Ok(())
    }

    /// Stop the active session and finalize the artifact
    pub async fn stop(&self) -> Result<ArtifactRef, CaptureError> {
        let mut inner = self.inner.lock().await;

        let mut active = match inner.active.take() {
            Some(active) => active,
            None => return Err(CaptureError::NoActiveSession),
        };

        if let Err(e) = active.backend.stop().await {
            active.writer_task.abort();
            inner.state = CaptureState::Stopped;
            return Err(e);
        }

        let artifact = active
            .writer_task
            .await
            .map_err(|e| CaptureError::Device(format!("capture writer task failed: {e}")))??;

        info!(
            "Capture session stopped: {} ({:.1}s)",
            artifact.path.display(),
            artifact.duration_seconds
        );

        inner.state = CaptureState::Stopped;
        inner.last_artifact = Some(artifact.clone());

        Ok(artifact)
    }

    /// Current state of the controller
    pub async fn state(&self) -> CaptureState {
        self.inner.lock().await.state
    }

    /// Seconds of audio written for the active session
    ///
    /// Derived from the sample count, so pausing freezes it.
    pub async fn elapsed_seconds(&self) -> f64 {
        let inner = self.inner.lock().await;
        match &inner.active {
            Some(active) => {
                active.samples_written.load(Ordering::SeqCst) as f64
                    / (self.config.sample_rate as f64 * self.config.channels as f64)
            }
            None => 0.0,
        }
    }

    /// When the active session started, if any
    pub async fn started_at(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().await.active.as_ref().map(|a| a.started_at)
    }

    /// The most recently finalized artifact, if any
    ///
    /// Retained across failures and across the start of a new session so the
    /// caller can retry transcription or play it back.
    pub async fn last_artifact(&self) -> Option<ArtifactRef> {
        self.inner.lock().await.last_artifact.clone()
    }

    fn backend_config(&self) -> CaptureBackendConfig {
        CaptureBackendConfig {
            target_sample_rate: self.config.sample_rate,
            target_channels: self.config.channels,
            ..Default::default()
        }
    }
}
