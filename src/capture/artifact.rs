use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use super::backend::AudioFrame;
use crate::error::CaptureError;

/// Reference to a finalized capture artifact
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactRef {
    /// Path to the WAV file
    pub path: PathBuf,
    /// Duration in seconds, derived from the samples actually written
    pub duration_seconds: f64,
}

/// Writes a capture session to disk as a single WAV file
pub struct ArtifactWriter {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    path: PathBuf,
    sample_rate: u32,
    channels: u16,
    sample_count: u64,
}

impl ArtifactWriter {
    pub fn new(path: PathBuf, sample_rate: u32, channels: u16) -> Result<Self, CaptureError> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let writer = hound::WavWriter::create(&path, spec)
            .map_err(|e| CaptureError::Device(format!("failed to create WAV file: {e}")))?;

        Ok(Self {
            writer: Some(writer),
            path,
            sample_rate,
            channels,
            sample_count: 0,
        })
    }

    pub fn write_frame(&mut self, frame: &AudioFrame) -> Result<(), CaptureError> {
        if let Some(writer) = &mut self.writer {
            for &sample in &frame.samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| CaptureError::Device(format!("failed to write sample: {e}")))?;
            }
            self.sample_count += frame.samples.len() as u64;
        }
        Ok(())
    }

    /// Samples written so far (across all channels)
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn finish(mut self) -> Result<ArtifactRef, CaptureError> {
        if let Some(writer) = self.writer.take() {
            writer
                .finalize()
                .map_err(|e| CaptureError::Device(format!("failed to finalize WAV file: {e}")))?;
        }

        let duration_seconds =
            self.sample_count as f64 / (self.sample_rate as f64 * self.channels as f64);

        Ok(ArtifactRef {
            path: self.path.clone(),
            duration_seconds,
        })
    }
}

impl Drop for ArtifactWriter {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.finalize() {
                warn!("Failed to finalize WAV writer on drop: {}", e);
            }
        }
    }
}
