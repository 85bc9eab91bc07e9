use std::sync::Arc;

use crate::config::Config;
use crate::documents::DocumentStorage;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owner-scoped access goes through `Caller::scope`, never this field directly.
    pub store: Arc<dyn RecordStore>,
    pub documents: Arc<dyn DocumentStorage>,
    pub config: Config,
}
