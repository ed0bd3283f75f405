//! whisper.cpp inference backend (enabled with the `whisper` feature)

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::backend::{EngineBackend, EngineContext};
use super::types::{EngineInitOptions, RawSegment, RawTranscript, TranscriptionRequest};
use crate::capture::AudioFile;
use crate::error::EngineError;

pub struct WhisperBackend;

impl WhisperBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WhisperBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EngineBackend for WhisperBackend {
    async fn init(
        &self,
        options: &EngineInitOptions,
    ) -> Result<Arc<dyn EngineContext>, EngineError> {
        let model_path = options.model_path.to_string_lossy().to_string();
        let use_gpu = options.use_gpu;

        // Model load is CPU/IO heavy; keep it off the async threads
        let context = tokio::task::spawn_blocking(move || {
            let mut params = WhisperContextParameters::default();
            params.use_gpu(use_gpu);
            WhisperContext::new_with_params(&model_path, params)
        })
        .await
        .map_err(|e| EngineError::InitFailed(format!("model load task failed: {e}")))?
        .map_err(|e| EngineError::InitFailed(e.to_string()))?;

        Ok(Arc::new(WhisperEngineContext {
            context: Mutex::new(Some(Arc::new(context))),
        }))
    }

    fn name(&self) -> &str {
        "whisper.cpp"
    }
}

struct WhisperEngineContext {
    context: Mutex<Option<Arc<WhisperContext>>>,
}

#[async_trait::async_trait]
impl EngineContext for WhisperEngineContext {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<RawTranscript, EngineError> {
        let context = {
            let guard = self.context.lock().await;
            guard.clone().ok_or(EngineError::NotInitialized)?
        };

        let audio = AudioFile::open(&request.audio_path)
            .map_err(|e| EngineError::Engine(format!("failed to read artifact: {e}")))?;
        let samples = audio.samples_f32();

        let language = request.language.clone();
        let word_threshold = request.word_threshold;
        let max_context_tokens = request.max_context_tokens;
        let max_segment_length = request.max_segment_length;

        let raw = tokio::task::spawn_blocking(move || -> Result<RawTranscript, EngineError> {
            let mut state = context
                .create_state()
                .map_err(|e| EngineError::Engine(e.to_string()))?;

            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            params.set_language(language.as_deref());
            params.set_translate(false);
            params.set_thold_pt(word_threshold);
            params.set_n_max_text_ctx(max_context_tokens);
            params.set_max_len(max_segment_length);
            params.set_print_special(false);
            params.set_print_progress(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);

            state
                .full(params, &samples)
                .map_err(|e| EngineError::Engine(e.to_string()))?;

            let n_segments = state
                .full_n_segments()
                .map_err(|e| EngineError::Engine(e.to_string()))?;

            let mut segments = Vec::with_capacity(n_segments as usize);
            let mut text = String::new();

            for i in 0..n_segments {
                let segment_text = state
                    .full_get_segment_text(i)
                    .map_err(|e| EngineError::Engine(e.to_string()))?;
                // whisper.cpp reports timestamps in centiseconds
                let t0 = state
                    .full_get_segment_t0(i)
                    .map_err(|e| EngineError::Engine(e.to_string()))?;
                let t1 = state
                    .full_get_segment_t1(i)
                    .map_err(|e| EngineError::Engine(e.to_string()))?;

                text.push_str(&segment_text);
                segments.push(RawSegment {
                    start_ms: t0 * 10,
                    end_ms: t1 * 10,
                    text: segment_text,
                });
            }

            Ok(RawTranscript { text, segments })
        })
        .await
        .map_err(|e| EngineError::Engine(format!("inference task failed: {e}")))??;

        debug!(
            "whisper produced {} segments, {} chars",
            raw.segments.len(),
            raw.text.len()
        );

        Ok(raw)
    }

    async fn release(&self) -> Result<(), EngineError> {
        let context = self.context.lock().await.take();
        if let Some(context) = context {
            // Last Arc drop frees the native model memory
            tokio::task::spawn_blocking(move || drop(context))
                .await
                .map_err(|e| EngineError::Engine(format!("teardown task failed: {e}")))?;
            info!("whisper context released");
        }
        Ok(())
    }
}
