// Integration tests for the playback controller
//
// These tests verify the single-live-instance invariant and the
// at-most-once completion signal.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use common::write_test_wav;
use meetscribe::error::PlaybackError;
use meetscribe::playback::{PlaybackController, WavClockSink};
use tempfile::TempDir;

fn controller_with_counter() -> (PlaybackController, Arc<AtomicUsize>) {
    let completions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&completions);
    let controller = PlaybackController::new(Arc::new(WavClockSink::new())).with_on_complete(
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );
    (controller, completions)
}

#[tokio::test]
async fn test_completion_fires_exactly_once() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("short.wav");
    write_test_wav(&path, 0.2);

    let (controller, completions) = controller_with_counter();

    controller.play(&path).await?;
    assert!(controller.is_active().await);

    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(completions.load(Ordering::SeqCst), 1);
    assert!(!controller.is_active().await);

    Ok(())
}

#[tokio::test]
async fn test_new_play_supersedes_prior_instance() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("one-second.wav");
    write_test_wav(&path, 1.0);

    let (controller, completions) = controller_with_counter();

    controller.play(&path).await?;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Restart playback; the first instance is stopped and released, and
    // its completion signal must never fire
    controller.play(&path).await?;
    tokio::time::sleep(Duration::from_millis(1300)).await;

    assert_eq!(completions.load(Ordering::SeqCst), 1);
    assert!(!controller.is_active().await);

    Ok(())
}

#[tokio::test]
async fn test_stop_suppresses_completion_and_is_idempotent() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("clip.wav");
    write_test_wav(&path, 0.3);

    let (controller, completions) = controller_with_counter();

    controller.play(&path).await?;
    controller.stop().await;
    controller.stop().await;
    assert!(!controller.is_active().await);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(completions.load(Ordering::SeqCst), 0);

    Ok(())
}

#[tokio::test]
async fn test_invalid_artifact_rejected() -> Result<()> {
    let (controller, _) = controller_with_counter();

    let err = controller
        .play(std::path::Path::new("/nonexistent/audio.wav"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlaybackError::InvalidArtifact(_)));
    assert!(!controller.is_active().await);

    Ok(())
}
