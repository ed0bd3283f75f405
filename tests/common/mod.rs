// Shared fakes and fixtures for the integration tests.
//
// The engine and capture fakes implement the public backend traits, the way
// a platform integration would, but with scripted behavior and counters so
// tests can observe teardown counts and stale-result handling.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};

use meetscribe::capture::{AudioFrame, CaptureBackend};
use meetscribe::engine::{
    EngineBackend, EngineContext, EngineInitOptions, RawSegment, RawTranscript,
    TranscriptionRequest,
};
use meetscribe::error::{CaptureError, EngineError};

// ============================================================================
// Scripted engine
// ============================================================================

/// What the scripted context does for one transcribe call
#[derive(Clone)]
pub enum ScriptedBehavior {
    /// Sleep for `delay`, then return the given transcript
    Result {
        text: String,
        segments: Vec<RawSegment>,
        delay: Duration,
    },
    /// Fail with an engine error
    Fail(String),
}

impl ScriptedBehavior {
    pub fn text(text: &str) -> Self {
        ScriptedBehavior::Result {
            text: text.to_string(),
            segments: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn text_after(text: &str, delay: Duration) -> Self {
        ScriptedBehavior::Result {
            text: text.to_string(),
            segments: Vec::new(),
            delay,
        }
    }

    pub fn segments(text: &str, segments: Vec<RawSegment>) -> Self {
        ScriptedBehavior::Result {
            text: text.to_string(),
            segments,
            delay: Duration::ZERO,
        }
    }
}

/// Counters shared between a scripted backend and the contexts it creates
#[derive(Default)]
pub struct ScriptedCounters {
    pub contexts_created: AtomicUsize,
    pub teardowns: AtomicUsize,
    pub transcribe_calls: AtomicUsize,
}

pub struct ScriptedEngine {
    pub behaviors: Arc<Mutex<VecDeque<ScriptedBehavior>>>,
    pub counters: Arc<ScriptedCounters>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            behaviors: Arc::new(Mutex::new(VecDeque::new())),
            counters: Arc::new(ScriptedCounters::default()),
        }
    }

    pub async fn push(&self, behavior: ScriptedBehavior) {
        self.behaviors.lock().await.push_back(behavior);
    }
}

#[async_trait::async_trait]
impl EngineBackend for ScriptedEngine {
    async fn init(
        &self,
        _options: &EngineInitOptions,
    ) -> Result<Arc<dyn EngineContext>, EngineError> {
        self.counters.contexts_created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(ScriptedContext {
            behaviors: Arc::clone(&self.behaviors),
            counters: Arc::clone(&self.counters),
        }))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct ScriptedContext {
    behaviors: Arc<Mutex<VecDeque<ScriptedBehavior>>>,
    counters: Arc<ScriptedCounters>,
}

#[async_trait::async_trait]
impl EngineContext for ScriptedContext {
    async fn transcribe(
        &self,
        _request: &TranscriptionRequest,
    ) -> Result<RawTranscript, EngineError> {
        self.counters.transcribe_calls.fetch_add(1, Ordering::SeqCst);

        let behavior = self
            .behaviors
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| ScriptedBehavior::text("default transcript"));

        match behavior {
            ScriptedBehavior::Result {
                text,
                segments,
                delay,
            } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(RawTranscript { text, segments })
            }
            ScriptedBehavior::Fail(message) => Err(EngineError::Engine(message)),
        }
    }

    async fn release(&self) -> Result<(), EngineError> {
        self.counters.teardowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Scripted capture backend
// ============================================================================

/// Capture backend producing synthetic 16kHz mono frames
pub struct ScriptedCaptureBackend {
    /// Whether the permission prompt is granted
    pub grant_permission: bool,
    /// Number of frames to emit; None keeps emitting until stopped
    pub frame_count: Option<usize>,
    /// Delay between frames (zero = burst)
    pub interval: Duration,
    /// Samples per emitted frame
    pub samples_per_frame: usize,
    stopped: Arc<AtomicBool>,
    capturing: bool,
}

impl ScriptedCaptureBackend {
    /// Emit exactly `frames` frames as fast as possible, then close
    pub fn burst(frames: usize, samples_per_frame: usize) -> Self {
        Self {
            grant_permission: true,
            frame_count: Some(frames),
            interval: Duration::ZERO,
            samples_per_frame,
            stopped: Arc::new(AtomicBool::new(false)),
            capturing: false,
        }
    }

    /// Emit frames every `interval` until stopped
    pub fn continuous(interval: Duration, samples_per_frame: usize) -> Self {
        Self {
            grant_permission: true,
            frame_count: None,
            interval,
            samples_per_frame,
            stopped: Arc::new(AtomicBool::new(false)),
            capturing: false,
        }
    }

    /// Backend whose permission prompt is denied
    pub fn denied() -> Self {
        let mut backend = Self::burst(0, 0);
        backend.grant_permission = false;
        backend
    }
}

#[async_trait::async_trait]
impl CaptureBackend for ScriptedCaptureBackend {
    async fn request_permission(&mut self) -> bool {
        self.grant_permission
    }

    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        let (tx, rx) = mpsc::channel(100);
        let stopped = Arc::clone(&self.stopped);
        let frame_count = self.frame_count;
        let interval = self.interval;
        let samples_per_frame = self.samples_per_frame;
        self.capturing = true;

        tokio::spawn(async move {
            let mut i = 0usize;
            loop {
                if stopped.load(Ordering::SeqCst) {
                    break;
                }
                if let Some(count) = frame_count {
                    if i >= count {
                        break;
                    }
                }
                let frame = AudioFrame {
                    samples: vec![(i % 100) as i16; samples_per_frame],
                    sample_rate: 16000,
                    channels: 1,
                    timestamp_ms: i as u64 * 100,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
                i += 1;
                if !interval.is_zero() {
                    tokio::time::sleep(interval).await;
                }
            }
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
        "scripted"
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Write a silent 16kHz mono WAV of the given duration
pub fn write_test_wav(path: &Path, seconds: f64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create test wav");
    let samples = (16000.0 * seconds) as usize;
    for _ in 0..samples {
        writer.write_sample(0i16).expect("write test sample");
    }
    writer.finalize().expect("finalize test wav");
}
