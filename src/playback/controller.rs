use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use super::sink::PlaybackSink;
use crate::error::PlaybackError;

/// Callback invoked when a playback instance completes on its own
pub type CompletionCallback = Arc<dyn Fn() + Send + Sync>;

struct Inner {
    /// Bumped for every new or stopped instance; a completion carrying a
    /// stale generation is suppressed.
    generation: u64,
    active: bool,
}

/// Replays capture artifacts; at most one playback resource is live
///
/// Starting a new playback while another is active stops and releases the
/// prior instance first, and the prior instance's completion signal never
/// fires. The completion callback fires at most once per instance.
pub struct PlaybackController {
    sink: Arc<dyn PlaybackSink>,
    inner: Arc<Mutex<Inner>>,
    on_complete: Option<CompletionCallback>,
}

impl PlaybackController {
    pub fn new(sink: Arc<dyn PlaybackSink>) -> Self {
        Self {
            sink,
            inner: Arc::new(Mutex::new(Inner {
                generation: 0,
                active: false,
            })),
            on_complete: None,
        }
    }

    /// Register a completion callback, replacing any previous one
    pub fn with_on_complete(mut self, callback: CompletionCallback) -> Self {
        self.on_complete = Some(callback);
        self
    }

    /// Start playing the artifact at `path`
    pub async fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        let mut inner = self.inner.lock().await;

        if inner.active {
            info!("Stopping prior playback instance before starting a new one");
            self.sink.stop().await;
            inner.active = false;
            inner.generation += 1;
        }

        let done_rx = self.sink.start(path).await?;

        inner.generation += 1;
        inner.active = true;
        let generation = inner.generation;
        drop(inner);

        let inner_ref = Arc::clone(&self.inner);
        let on_complete = self.on_complete.clone();

        tokio::spawn(async move {
            // rx errors when the sink was stopped; nothing fires then
            if done_rx.await.is_err() {
                return;
            }

            let mut inner = inner_ref.lock().await;
            if inner.generation != generation || !inner.active {
                return;
            }
            inner.active = false;
            drop(inner);

            info!("Playback finished");
            if let Some(callback) = on_complete {
                callback();
            }
        });

        Ok(())
    }

    /// Stop the current playback; no-op when nothing is playing
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        if !inner.active {
            return;
        }
        self.sink.stop().await;
        inner.active = false;
        inner.generation += 1;
        info!("Playback stopped");
    }

    /// Whether a playback instance currently holds the audio device
    pub async fn is_active(&self) -> bool {
        self.inner.lock().await.active
    }
}
