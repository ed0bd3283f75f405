// End-to-end session demo: capture from a WAV file, transcribe it with the
// whisper backend, and print the transcript items.
//
//   cargo run --example record_and_transcribe --features whisper -- \
//       recording.wav models/ggml-base.bin

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use meetscribe::capture::{CaptureConfig, CaptureController, CaptureSource};
use meetscribe::engine::{EngineBackendFactory, EngineHandle, EngineInitOptions};
use meetscribe::playback::{PlaybackController, WavClockSink};
use meetscribe::session::{SessionConfig, SessionCoordinator};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let usage = "usage: record_and_transcribe <wav-file> <model-file>";
    let wav: PathBuf = args.next().context(usage)?.into();
    let model: PathBuf = args.next().context(usage)?.into();

    let backend = EngineBackendFactory::create()?;
    let engine = Arc::new(EngineHandle::new(backend, Duration::from_secs(90)));
    engine
        .initialize(&EngineInitOptions {
            model_path: model,
            use_gpu: false,
            use_core_ml: false,
        })
        .await?;

    let capture = CaptureController::new(CaptureConfig {
        output_dir: PathBuf::from("recordings"),
        source: CaptureSource::File(wav),
        ..Default::default()
    });
    let playback = PlaybackController::new(Arc::new(WavClockSink::new()));
    let coordinator =
        SessionCoordinator::new(capture, engine, playback, SessionConfig::default());

    coordinator.begin_session().await?;
    info!("Capturing...");

    // Wait until the file backend has drained into the artifact
    let mut elapsed = 0.0;
    loop {
        tokio::time::sleep(Duration::from_millis(200)).await;
        let now = coordinator.stats().await.elapsed_seconds;
        if now > 0.0 && (now - elapsed).abs() < f64::EPSILON {
            break;
        }
        elapsed = now;
    }

    let outcome = coordinator.end_session().await?;

    println!("== {} ==", outcome.artifact.path.display());
    println!("{}", outcome.result.full_text.trim());
    for item in &outcome.items {
        println!("[{:7.2}s] {}", item.timestamp_seconds, item.text.trim());
    }

    coordinator.shutdown().await;
    Ok(())
}
