// Integration tests for the transcription engine handle
//
// These tests verify the init/ready/release state machine, single-flight
// teardown, the wall-clock timeout, and the generation-token guard against
// stale native completions.

mod common;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use common::{ScriptedBehavior, ScriptedCounters, ScriptedEngine};
use meetscribe::engine::{
    EngineHandle, EngineInitOptions, EngineState, RawSegment, TranscriptionRequest,
};
use meetscribe::error::EngineError;
use tempfile::TempDir;

struct Fixture {
    handle: EngineHandle,
    counters: Arc<ScriptedCounters>,
    behaviors: Arc<tokio::sync::Mutex<std::collections::VecDeque<ScriptedBehavior>>>,
    options: EngineInitOptions,
    _dir: TempDir,
}

fn fixture(timeout: Duration) -> Fixture {
    let dir = TempDir::new().expect("tempdir");
    let model_path = dir.path().join("model.bin");
    std::fs::write(&model_path, b"fake model").expect("write model");

    let engine = ScriptedEngine::new();
    let counters = Arc::clone(&engine.counters);
    let behaviors = Arc::clone(&engine.behaviors);
    let handle = EngineHandle::new(Box::new(engine), timeout);

    Fixture {
        handle,
        counters,
        behaviors,
        options: EngineInitOptions {
            model_path,
            use_gpu: false,
            use_core_ml: false,
        },
        _dir: dir,
    }
}

fn request() -> TranscriptionRequest {
    TranscriptionRequest::new(PathBuf::from("artifact.wav"))
}

#[tokio::test]
async fn test_transcribe_before_initialize_fails() -> Result<()> {
    let fx = fixture(Duration::from_secs(5));

    let err = fx.handle.transcribe(&request()).await.unwrap_err();
    assert!(matches!(err, EngineError::NotInitialized));
    assert_eq!(fx.counters.transcribe_calls.load(Ordering::SeqCst), 0);

    Ok(())
}

#[tokio::test]
async fn test_initialize_with_missing_model_fails() -> Result<()> {
    let fx = fixture(Duration::from_secs(5));

    let options = EngineInitOptions {
        model_path: PathBuf::from("/nonexistent/model.bin"),
        ..fx.options.clone()
    };
    let err = fx.handle.initialize(&options).await.unwrap_err();
    assert!(matches!(err, EngineError::ModelNotFound(_)));
    assert_eq!(fx.handle.state().await, EngineState::Uninitialized);

    Ok(())
}

#[tokio::test]
async fn test_round_trip_converts_milliseconds_and_keeps_order() -> Result<()> {
    let fx = fixture(Duration::from_secs(5));
    fx.handle.initialize(&fx.options).await?;
    assert_eq!(fx.handle.state().await, EngineState::Ready);

    fx.behaviors.lock().await.push_back(ScriptedBehavior::segments(
        "hello world",
        vec![
            RawSegment {
                start_ms: 0,
                end_ms: 1500,
                text: "hello".to_string(),
            },
            RawSegment {
                start_ms: 1500,
                end_ms: 3000,
                text: " world".to_string(),
            },
        ],
    ));

    let result = fx.handle.transcribe(&request()).await?;
    assert_eq!(result.full_text, "hello world");
    assert_eq!(result.segments.len(), 2);
    assert!((result.segments[0].end_seconds - 1.5).abs() < 1e-9);
    assert!((result.segments[1].start_seconds - 1.5).abs() < 1e-9);

    // Ordering is non-decreasing in start_seconds
    for pair in result.segments.windows(2) {
        assert!(pair[0].start_seconds <= pair[1].start_seconds);
    }

    fx.handle.release().await;
    assert_eq!(fx.handle.state().await, EngineState::Uninitialized);
    assert_eq!(fx.counters.teardowns.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn test_release_many_times_tears_down_once() -> Result<()> {
    let fx = fixture(Duration::from_secs(5));
    fx.handle.initialize(&fx.options).await?;

    for _ in 0..4 {
        fx.handle.release().await;
    }

    assert_eq!(fx.counters.teardowns.load(Ordering::SeqCst), 1);
    assert_eq!(fx.handle.state().await, EngineState::Uninitialized);

    Ok(())
}

#[tokio::test]
async fn test_concurrent_release_is_reentrancy_safe() -> Result<()> {
    let fx = fixture(Duration::from_secs(5));
    fx.handle.initialize(&fx.options).await?;

    tokio::join!(fx.handle.release(), fx.handle.release(), fx.handle.release());

    assert_eq!(fx.counters.teardowns.load(Ordering::SeqCst), 1);
    assert_eq!(fx.handle.state().await, EngineState::Uninitialized);

    Ok(())
}

#[tokio::test]
async fn test_release_without_initialize_is_noop() -> Result<()> {
    let fx = fixture(Duration::from_secs(5));

    fx.handle.release().await;
    fx.handle.release().await;

    assert_eq!(fx.counters.teardowns.load(Ordering::SeqCst), 0);
    assert_eq!(fx.handle.state().await, EngineState::Uninitialized);

    Ok(())
}

#[tokio::test]
async fn test_reinitialize_releases_prior_context_first() -> Result<()> {
    let fx = fixture(Duration::from_secs(5));

    fx.handle.initialize(&fx.options).await?;
    fx.handle.initialize(&fx.options).await?;

    // Old context fully torn down, new one live; never two at once
    assert_eq!(fx.counters.contexts_created.load(Ordering::SeqCst), 2);
    assert_eq!(fx.counters.teardowns.load(Ordering::SeqCst), 1);
    assert_eq!(fx.handle.state().await, EngineState::Ready);

    fx.handle.release().await;
    assert_eq!(fx.counters.teardowns.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn test_empty_result_is_distinct_error() -> Result<()> {
    let fx = fixture(Duration::from_secs(5));
    fx.handle.initialize(&fx.options).await?;

    fx.behaviors
        .lock()
        .await
        .push_back(ScriptedBehavior::text("   \n"));

    let err = fx.handle.transcribe(&request()).await.unwrap_err();
    assert!(matches!(err, EngineError::EmptyResult));

    // The handle stays Ready so the caller can retry
    assert_eq!(fx.handle.state().await, EngineState::Ready);

    Ok(())
}

#[tokio::test]
async fn test_timeout_reported_and_stale_completion_discarded() -> Result<()> {
    let fx = fixture(Duration::from_millis(100));
    fx.handle.initialize(&fx.options).await?;

    // The native call outlives the timeout
    fx.behaviors.lock().await.push_back(ScriptedBehavior::text_after(
        "stale result",
        Duration::from_millis(300),
    ));
    fx.behaviors
        .lock()
        .await
        .push_back(ScriptedBehavior::text("fresh result"));

    let err = fx.handle.transcribe(&request()).await.unwrap_err();
    assert!(matches!(err, EngineError::Timeout(_)));

    // Let the abandoned native operation fire its completion; the
    // generation token makes the handle discard it instead of delivering
    tokio::time::sleep(Duration::from_millis(400)).await;

    let result = fx.handle.transcribe(&request()).await?;
    assert_eq!(result.full_text, "fresh result");
    assert_eq!(fx.counters.transcribe_calls.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn test_engine_failure_propagates() -> Result<()> {
    let fx = fixture(Duration::from_secs(5));
    fx.handle.initialize(&fx.options).await?;

    fx.behaviors
        .lock()
        .await
        .push_back(ScriptedBehavior::Fail("decoder exploded".to_string()));

    let err = fx.handle.transcribe(&request()).await.unwrap_err();
    assert!(matches!(err, EngineError::Engine(_)));

    Ok(())
}
