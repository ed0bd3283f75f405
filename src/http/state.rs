use std::sync::Arc;

use crate::session::SessionCoordinator;
use crate::storage::KvStore;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The one session coordinator for this process
    pub coordinator: Arc<SessionCoordinator>,
    /// Meeting / account persistence
    pub store: Arc<KvStore>,
}

impl AppState {
    pub fn new(coordinator: Arc<SessionCoordinator>, store: Arc<KvStore>) -> Self {
        Self { coordinator, store }
    }
}
