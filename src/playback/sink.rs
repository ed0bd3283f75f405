use std::path::Path;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info};

use crate::capture::AudioFile;
use crate::error::PlaybackError;

/// Audio output seam for playback
///
/// `start` returns a receiver that fires once when the sink finishes the
/// artifact on its own; `stop` drops the in-flight playback, in which case
/// the receiver never fires.
#[async_trait::async_trait]
pub trait PlaybackSink: Send + Sync {
    async fn start(&self, path: &Path) -> Result<oneshot::Receiver<()>, PlaybackError>;

    async fn stop(&self);
}

/// Headless sink that validates the artifact and paces a real-time clock
///
/// Stands in for a device output on hosts without one; device backends plug
/// in behind the same trait.
pub struct WavClockSink {
    cancel: Mutex<Option<oneshot::Sender<()>>>,
}

impl WavClockSink {
    pub fn new() -> Self {
        Self {
            cancel: Mutex::new(None),
        }
    }
}

impl Default for WavClockSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PlaybackSink for WavClockSink {
    async fn start(&self, path: &Path) -> Result<oneshot::Receiver<()>, PlaybackError> {
        let audio =
            AudioFile::open(path).map_err(|e| PlaybackError::InvalidArtifact(e.to_string()))?;
        let duration = Duration::from_secs_f64(audio.duration_seconds);

        let (done_tx, done_rx) = oneshot::channel();
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        {
            let mut cancel = self.cancel.lock().await;
            *cancel = Some(cancel_tx);
        }

        info!(
            "Playback started: {} ({:.1}s)",
            path.display(),
            audio.duration_seconds
        );

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(duration) => {
                    let _ = done_tx.send(());
                }
                _ = cancel_rx => {
                    debug!("Playback cancelled before completion");
                }
            }
        });

        Ok(done_rx)
    }

    async fn stop(&self) {
        let cancel = self.cancel.lock().await.take();
        if let Some(tx) = cancel {
            let _ = tx.send(());
        }
    }
}
