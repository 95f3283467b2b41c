use std::sync::Arc;

use crate::common::RelayConfig;
use crate::store::SessionUploadStore;

/// Shared application state
/// Passed to all handlers via Axum State extractor
#[derive(Clone)]
pub struct AppState {
    pub store: SessionUploadStore,
    pub config: Arc<RelayConfig>, // Arc = cheap clone per request
}

impl AppState {
    pub fn new(store: SessionUploadStore, config: RelayConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
