use std::sync::Arc;
use crate::data::opensky::SnapshotSource;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Fetches a fresh snapshot for every request
    pub source: Arc<dyn SnapshotSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self { source }
    }
}
