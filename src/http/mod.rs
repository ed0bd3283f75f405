//! HTTP API server for external control (the UI layer boundary)
//!
//! This module provides a REST API for driving recording sessions:
//! - POST /sessions/start|stop|pause|resume|retry - session control
//! - GET  /sessions/status - coordinator state snapshot
//! - POST /playback/start|stop - artifact playback
//! - GET  /meetings, /meetings/:id - stored meetings
//! - GET  /health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
