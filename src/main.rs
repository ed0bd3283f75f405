use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use meetscribe::capture::{CaptureConfig, CaptureController};
use meetscribe::engine::{
    EngineBackendFactory, EngineHandle, EngineInitOptions, TranscriptionRequest,
};
use meetscribe::playback::{PlaybackController, WavClockSink};
use meetscribe::session::{SessionConfig, SessionCoordinator};
use meetscribe::storage::KvStore;
use meetscribe::{create_router, AppState, Config};

#[derive(Parser)]
#[command(name = "meetscribe")]
#[command(about = "Meeting recording and on-device transcription service")]
struct Cli {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/meetscribe")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP control API
    Serve,
    /// Transcribe an existing WAV file and print the result
    Transcribe {
        /// Path to a 16kHz mono 16-bit PCM WAV file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Serve => serve(cfg).await,
        Command::Transcribe { file } => transcribe(cfg, file).await,
    }
}

fn build_engine(cfg: &Config) -> Result<Arc<EngineHandle>> {
    let backend = EngineBackendFactory::create()
        .context("no inference backend available in this build")?;
    Ok(Arc::new(EngineHandle::new(
        backend,
        Duration::from_secs(cfg.engine.transcribe_timeout_secs),
    )))
}

fn engine_init_options(cfg: &Config) -> EngineInitOptions {
    EngineInitOptions {
        model_path: cfg.engine.model_path.clone(),
        use_gpu: cfg.engine.use_gpu,
        use_core_ml: cfg.engine.use_core_ml,
    }
}

async fn serve(cfg: Config) -> Result<()> {
    let engine = build_engine(&cfg)?;

    let init_options = engine_init_options(&cfg);
    if init_options.model_path.is_file() {
        engine
            .initialize(&init_options)
            .await
            .context("engine initialization failed")?;
    } else {
        warn!(
            "Model file {} not found; transcription will fail until it is provided",
            init_options.model_path.display()
        );
    }

    let capture = CaptureController::new(CaptureConfig {
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
        output_dir: PathBuf::from(&cfg.audio.recordings_path),
        source: cfg.audio.capture_source(),
    });

    let playback = PlaybackController::new(Arc::new(WavClockSink::new()));

    let session_config = SessionConfig {
        language: cfg.engine.language_option(),
        ..Default::default()
    };

    let coordinator = Arc::new(SessionCoordinator::new(
        capture,
        engine,
        playback,
        session_config,
    ));

    let store = Arc::new(KvStore::new(&cfg.storage.path)?);
    let state = AppState::new(Arc::clone(&coordinator), store);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("HTTP API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    // Release native resources on every exit path
    coordinator.shutdown().await;
    Ok(())
}

async fn transcribe(cfg: Config, file: PathBuf) -> Result<()> {
    let engine = build_engine(&cfg)?;

    engine
        .initialize(&engine_init_options(&cfg))
        .await
        .context("engine initialization failed")?;

    let mut request = TranscriptionRequest::new(file);
    request.language = cfg.engine.language_option();

    let result = engine.transcribe(&request).await;
    engine.release().await;

    let result = result.context("transcription failed")?;

    println!("{}", result.full_text.trim());
    for segment in &result.segments {
        println!(
            "[{:7.2}s - {:7.2}s] {}",
            segment.start_seconds,
            segment.end_seconds,
            segment.text.trim()
        );
    }

    Ok(())
}
