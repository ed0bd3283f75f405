use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub engine: EngineConfig,
    pub storage: StorageConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub recordings_path: String,
    pub sample_rate: u32,
    pub channels: u16,
    /// "microphone" or a path to a WAV file to capture from
    pub source: String,
}

#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    pub model_path: PathBuf,
    pub use_gpu: bool,
    pub use_core_ml: bool,
    /// Language code, or "auto" for detection
    pub language: String,
    pub transcribe_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl AudioConfig {
    /// Resolve the configured capture source
    pub fn capture_source(&self) -> crate::capture::CaptureSource {
        if self.source == "microphone" {
            crate::capture::CaptureSource::Microphone
        } else {
            crate::capture::CaptureSource::File(PathBuf::from(&self.source))
        }
    }
}

impl EngineConfig {
    /// Language option handed to the engine; "auto" maps to detection
    pub fn language_option(&self) -> Option<String> {
        if self.language == "auto" {
            None
        } else {
            Some(self.language.clone())
        }
    }
}
