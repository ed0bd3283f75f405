use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use super::state::AppState;
use crate::error::{CaptureError, EngineError, PlaybackError, SessionError};
use crate::session::{SessionOutcome, SessionStats};
use crate::storage::Meeting;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StopSessionRequest {
    /// Optional meeting title (defaults to a timestamped one)
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub status: String,
    pub meeting: Meeting,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub stats: SessionStats,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Distinct failure kind so the client can offer differentiated retry text
    pub kind: String,
}

// ============================================================================
// Error mapping
// ============================================================================

fn error_kind(err: &SessionError) -> &'static str {
    match err {
        SessionError::Capture(CaptureError::PermissionDenied) => "permission_denied",
        SessionError::Capture(CaptureError::AlreadyActive) => "already_active",
        SessionError::Capture(CaptureError::InvalidState { .. }) => "invalid_state",
        SessionError::Capture(CaptureError::NoActiveSession) => "no_active_session",
        SessionError::Capture(CaptureError::Device(_)) => "device_error",
        SessionError::Engine(EngineError::Timeout(_)) => "timeout",
        SessionError::Engine(EngineError::EmptyResult) => "empty_result",
        SessionError::Engine(EngineError::NotInitialized) => "engine_not_initialized",
        SessionError::Engine(EngineError::ModelNotFound(_)) => "model_not_found",
        SessionError::Engine(_) => "engine_error",
        SessionError::Playback(PlaybackError::CaptureActive) => "capture_active",
        SessionError::Playback(_) => "playback_error",
        SessionError::NoArtifact => "no_artifact",
    }
}

fn status_for(err: &SessionError) -> StatusCode {
    match err {
        SessionError::Capture(CaptureError::PermissionDenied) => StatusCode::FORBIDDEN,
        SessionError::Capture(CaptureError::AlreadyActive)
        | SessionError::Capture(CaptureError::InvalidState { .. })
        | SessionError::Capture(CaptureError::NoActiveSession)
        | SessionError::Playback(PlaybackError::CaptureActive) => StatusCode::CONFLICT,
        SessionError::Capture(CaptureError::Device(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        SessionError::Engine(EngineError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
        SessionError::Engine(EngineError::EmptyResult) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::Engine(EngineError::NotInitialized) => StatusCode::SERVICE_UNAVAILABLE,
        SessionError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SessionError::Playback(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::NoArtifact => StatusCode::NOT_FOUND,
    }
}

fn session_error_response(err: SessionError) -> axum::response::Response {
    error!("Request failed: {}", err);
    (
        status_for(&err),
        Json(ErrorResponse {
            error: err.to_string(),
            kind: error_kind(&err).to_string(),
        }),
    )
        .into_response()
}

fn storage_error_response(err: crate::error::StorageError) -> axum::response::Response {
    error!("Storage failure: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
            kind: "storage_error".to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /sessions/start
pub async fn start_session(State(state): State<AppState>) -> impl IntoResponse {
    match state.coordinator.begin_session().await {
        Ok(()) => (
            StatusCode::OK,
            Json(StartSessionResponse {
                status: "recording".to_string(),
                message: "Capture session started".to_string(),
            }),
        )
            .into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /sessions/stop
///
/// Stops capture, transcribes the artifact and persists the meeting.
pub async fn stop_session(
    State(state): State<AppState>,
    Json(req): Json<StopSessionRequest>,
) -> impl IntoResponse {
    match state.coordinator.end_session().await {
        Ok(outcome) => persist_outcome(&state, outcome, req.title).await,
        Err(e) => session_error_response(e),
    }
}

/// POST /sessions/retry
///
/// Re-runs transcription on the retained artifact without re-recording.
pub async fn retry_transcription(
    State(state): State<AppState>,
    Json(req): Json<StopSessionRequest>,
) -> impl IntoResponse {
    match state.coordinator.retry_transcription().await {
        Ok(outcome) => persist_outcome(&state, outcome, req.title).await,
        Err(e) => session_error_response(e),
    }
}

async fn persist_outcome(
    state: &AppState,
    outcome: SessionOutcome,
    title: Option<String>,
) -> axum::response::Response {
    let title = title
        .unwrap_or_else(|| format!("Meeting {}", chrono::Utc::now().format("%Y-%m-%d %H:%M")));

    let mut meeting = Meeting::new(title, outcome.artifact.duration_seconds);
    meeting.audio_path = Some(outcome.artifact.path.display().to_string());
    meeting.transcript = outcome.items;

    if let Err(e) = state.store.add_meeting(meeting.clone()).await {
        return storage_error_response(e);
    }

    info!("Meeting persisted: {} ({})", meeting.title, meeting.id);

    (
        StatusCode::OK,
        Json(StopSessionResponse {
            status: "transcribed".to_string(),
            meeting,
        }),
    )
        .into_response()
}

/// POST /sessions/pause
pub async fn pause_session(State(state): State<AppState>) -> impl IntoResponse {
    match state.coordinator.pause().await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /sessions/resume
pub async fn resume_session(State(state): State<AppState>) -> impl IntoResponse {
    match state.coordinator.resume().await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => session_error_response(e),
    }
}

/// GET /sessions/status
pub async fn session_status(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.coordinator.stats().await;
    Json(StatusResponse { stats })
}

/// POST /playback/start
pub async fn start_playback(State(state): State<AppState>) -> impl IntoResponse {
    match state.coordinator.play_artifact().await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /playback/stop
pub async fn stop_playback(State(state): State<AppState>) -> impl IntoResponse {
    state.coordinator.stop_playback().await;
    StatusCode::OK.into_response()
}

/// GET /meetings
pub async fn list_meetings(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.get_meetings().await {
        Ok(meetings) => Json(meetings).into_response(),
        Err(e) => storage_error_response(e),
    }
}

/// GET /meetings/:meeting_id
pub async fn get_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.store.get_meeting(meeting_id).await {
        Ok(Some(meeting)) => Json(meeting).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Meeting {meeting_id} not found"),
                kind: "not_found".to_string(),
            }),
        )
            .into_response(),
        Err(e) => storage_error_response(e),
    }
}

/// DELETE /meetings/:meeting_id
pub async fn delete_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.store.delete_meeting(meeting_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Meeting {meeting_id} not found"),
                kind: "not_found".to_string(),
            }),
        )
            .into_response(),
        Err(e) => storage_error_response(e),
    }
}

/// POST /meetings/:meeting_id/items/:item_id/highlight
pub async fn toggle_highlight(
    State(state): State<AppState>,
    Path((meeting_id, item_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    match state.store.toggle_highlight(meeting_id, item_id).await {
        Ok(Some(highlighted)) => {
            Json(serde_json::json!({ "is_highlighted": highlighted })).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Transcript item {item_id} not found in meeting {meeting_id}"),
                kind: "not_found".to_string(),
            }),
        )
            .into_response(),
        Err(e) => storage_error_response(e),
    }
}
