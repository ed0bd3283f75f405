// Plays a WAV artifact through the headless clock sink and waits for the
// at-most-once completion signal.
//
//   cargo run --example playback -- recording.wav

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use meetscribe::capture::AudioFile;
use meetscribe::playback::{PlaybackController, WavClockSink};
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let path: PathBuf = std::env::args()
        .nth(1)
        .context("usage: playback <wav-file>")?
        .into();

    let audio = AudioFile::open(&path)?;
    info!(
        "Playing {} ({:.1}s, {}Hz)",
        audio.path, audio.duration_seconds, audio.sample_rate
    );

    let (done_tx, mut done_rx) = mpsc::channel(1);
    let controller =
        PlaybackController::new(Arc::new(WavClockSink::new())).with_on_complete(Arc::new(
            move || {
                let _ = done_tx.try_send(());
            },
        ));

    controller.play(&path).await?;
    done_rx.recv().await;
    info!("Playback complete");

    Ok(())
}
