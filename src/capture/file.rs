use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hound::WavReader;
use tokio::sync::mpsc;
use tracing::info;

use super::backend::{AudioFrame, CaptureBackend, CaptureBackendConfig};
use crate::error::CaptureError;

/// A decoded WAV file held in memory
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();

        let reader = WavReader::open(path)
            .map_err(|e| CaptureError::Device(format!("failed to open WAV file: {e}")))?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CaptureError::Device(format!("failed to read audio samples: {e}")))?;

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }

    /// Samples normalized to f32 in [-1.0, 1.0], as the inference engine expects
    pub fn samples_f32(&self) -> Vec<f32> {
        self.samples
            .iter()
            .map(|&s| s as f32 / i16::MAX as f32)
            .collect()
    }
}

/// Capture backend that streams frames out of an existing WAV file
///
/// Used for batch transcription of prior recordings and in tests. The file
/// must already match the target format; no resampling is performed.
pub struct FileCaptureBackend {
    path: PathBuf,
    config: CaptureBackendConfig,
    stopped: Arc<AtomicBool>,
    capturing: bool,
}

impl FileCaptureBackend {
    pub fn new(path: PathBuf, config: CaptureBackendConfig) -> Self {
        Self {
            path,
            config,
            stopped: Arc::new(AtomicBool::new(false)),
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl CaptureBackend for FileCaptureBackend {
    async fn request_permission(&mut self) -> bool {
        // No OS prompt for file input
        true
    }

    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        let audio = AudioFile::open(&self.path)?;

        if audio.sample_rate != self.config.target_sample_rate
            || audio.channels != self.config.target_channels
        {
            return Err(CaptureError::Device(format!(
                "file format mismatch: expected {}Hz/{}ch, got {}Hz/{}ch",
                self.config.target_sample_rate,
                self.config.target_channels,
                audio.sample_rate,
                audio.channels
            )));
        }

        let (tx, rx) = mpsc::channel(100);
        let stopped = Arc::clone(&self.stopped);
        stopped.store(false, Ordering::SeqCst);
        self.capturing = true;

        let samples_per_frame = (audio.sample_rate as u64 * audio.channels as u64
            * self.config.buffer_duration_ms
            / 1000) as usize;
        let frame_ms = self.config.buffer_duration_ms;
        let sample_rate = audio.sample_rate;
        let channels = audio.channels;

        tokio::spawn(async move {
            for (i, chunk) in audio.samples.chunks(samples_per_frame.max(1)).enumerate() {
                if stopped.load(Ordering::SeqCst) {
                    break;
                }
                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate,
                    channels,
                    timestamp_ms: i as u64 * frame_ms,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
            // Sender drops here, closing the channel
        });

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.stopped.store(true, Ordering::SeqCst);
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "file"
    }
}
