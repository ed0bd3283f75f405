use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, warn};

use super::backend::{check_model_path, EngineBackend, EngineContext};
use super::types::{EngineInitOptions, TranscriptionRequest, TranscriptionResult};
use crate::error::EngineError;

/// Default wall-clock bound on a single transcription call
pub const DEFAULT_TRANSCRIBE_TIMEOUT: Duration = Duration::from_secs(90);

/// Engine handle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Uninitialized,
    Initializing,
    Ready,
    Releasing,
}

struct Inner {
    state: EngineState,
    context: Option<Arc<dyn EngineContext>>,
    /// Request generation token; completions carrying a stale generation
    /// are discarded instead of delivered.
    generation: u64,
}

/// Owns the single native inference context
///
/// Initialize and release are single-flight: the operation gate is held for
/// the full duration of every native call, so a release can never tear down
/// a context while inference is running on it, and two contexts are never
/// alive at once.
pub struct EngineHandle {
    backend: Box<dyn EngineBackend>,
    timeout: Duration,
    inner: Arc<Mutex<Inner>>,
    op_gate: Arc<Mutex<()>>,
}

impl EngineHandle {
    pub fn new(backend: Box<dyn EngineBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            inner: Arc::new(Mutex::new(Inner {
                state: EngineState::Uninitialized,
                context: None,
                generation: 0,
            })),
            op_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Bring up a native context for the given model
    ///
    /// If a context is already live it is fully torn down first; the old and
    /// new contexts are never alive simultaneously.
    pub async fn initialize(&self, options: &EngineInitOptions) -> Result<(), EngineError> {
        let _gate = self.op_gate.lock().await;

        check_model_path(&options.model_path)?;

        // Implicit release of any prior context
        let prior = {
            let mut inner = self.inner.lock().await;
            let prior = inner.context.take();
            if prior.is_some() {
                inner.state = EngineState::Releasing;
                inner.generation += 1;
            }
            prior
        };
        if let Some(ctx) = prior {
            info!("Releasing prior engine context before re-initialization");
            if let Err(e) = ctx.release().await {
                warn!("Prior context teardown failed: {}", e);
            }
        }

        {
            let mut inner = self.inner.lock().await;
            inner.state = EngineState::Initializing;
        }

        info!(
            "Initializing engine: model={}, gpu={}, coreml={}, backend={}",
            options.model_path.display(),
            options.use_gpu,
            options.use_core_ml,
            self.backend.name()
        );

        match self.backend.init(options).await {
            Ok(context) => {
                let mut inner = self.inner.lock().await;
                inner.context = Some(context);
                inner.state = EngineState::Ready;
                info!("Engine initialized");
                Ok(())
            }
            Err(e) => {
                let mut inner = self.inner.lock().await;
                inner.state = EngineState::Uninitialized;
                Err(e)
            }
        }
    }

    /// Run a timeout-bounded transcription call
    ///
    /// The native operation is not cancellable; on timeout the request
    /// generation is invalidated so a late native completion is discarded
    /// rather than delivered to anyone.
    pub async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<TranscriptionResult, EngineError> {
        let (context, generation) = {
            let mut inner = self.inner.lock().await;
            if inner.state != EngineState::Ready {
                return Err(EngineError::NotInitialized);
            }
            let context = inner.context.clone().ok_or(EngineError::NotInitialized)?;
            inner.generation += 1;
            (context, inner.generation)
        };

        let (tx, rx) = oneshot::channel();
        let gate = Arc::clone(&self.op_gate);
        let inner_ref = Arc::clone(&self.inner);
        let request = request.clone();

        tokio::spawn(async move {
            // Serialize against initialize/release and other transcribe calls
            let _serial = gate.lock().await;
            let outcome = context.transcribe(&request).await;

            let inner = inner_ref.lock().await;
            if inner.generation != generation {
                debug!(
                    "Discarding stale transcription completion (generation {} superseded by {})",
                    generation, inner.generation
                );
                return;
            }
            drop(inner);
            let _ = tx.send(outcome);
        });

        match tokio::time::timeout(self.timeout, rx).await {
            Err(_) => {
                let mut inner = self.inner.lock().await;
                if inner.generation == generation {
                    inner.generation += 1;
                }
                warn!(
                    "Transcription timed out after {}s; abandoning native operation",
                    self.timeout.as_secs()
                );
                Err(EngineError::Timeout(self.timeout.as_secs()))
            }
            // Sender dropped: the completion was already judged stale
            Ok(Err(_)) => Err(EngineError::Engine(
                "transcription superseded before completion".to_string(),
            )),
            Ok(Ok(Err(e))) => Err(e),
            Ok(Ok(Ok(raw))) => {
                if raw.text.trim().is_empty() {
                    return Err(EngineError::EmptyResult);
                }
                Ok(TranscriptionResult::from_raw(raw))
            }
        }
    }

    /// Tear down the native context
    ///
    /// Idempotent and reentrancy-safe: duplicate callers observe
    /// Uninitialized and return without a second native teardown. Internal
    /// state is cleared before the teardown is awaited so no caller can see
    /// a half-torn-down Ready state.
    pub async fn release(&self) {
        let _gate = self.op_gate.lock().await;

        let context = {
            let mut inner = self.inner.lock().await;
            if inner.state == EngineState::Uninitialized {
                debug!("Engine already released, skipping");
                return;
            }
            inner.state = EngineState::Releasing;
            inner.generation += 1;
            inner.context.take()
        };

        if let Some(ctx) = context {
            info!("Releasing engine context");
            if let Err(e) = ctx.release().await {
                warn!("Engine teardown failed: {}", e);
            }
        }

        let mut inner = self.inner.lock().await;
        inner.state = EngineState::Uninitialized;
    }

    /// Current handle state
    pub async fn state(&self) -> EngineState {
        self.inner.lock().await.state
    }

    /// Whether a context is live and ready for transcription
    pub async fn is_initialized(&self) -> bool {
        self.inner.lock().await.state == EngineState::Ready
    }

    /// The configured transcription timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
