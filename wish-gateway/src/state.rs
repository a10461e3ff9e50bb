//! Shared handler state.

use std::sync::Arc;

use wish_store::WishStore;
use wish_upload::UploadPipeline;

/// Handles passed to every request handler.
///
/// Built once per process; cloning only bumps reference counts.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<WishStore>,
    pub pipeline: Arc<UploadPipeline>,
    /// Length of the configured secret. The secret itself is not kept here.
    pub secret_length: usize,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<WishStore>, pipeline: Arc<UploadPipeline>, secret_length: usize) -> Self {
        Self { store, pipeline, secret_length }
    }
}
