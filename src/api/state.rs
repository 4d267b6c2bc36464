//! Shared application state.

use std::sync::Arc;

use crate::storage::StorageConfig;

/// State shared by all request handlers. The storage config is the only
/// shared piece; collections and the active pointer are opened per
/// request, so the file on disk stays the single source of truth.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
}

impl AppState {
    pub fn new(storage: StorageConfig) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }
}
