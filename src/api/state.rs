use std::{sync::Arc, time::Duration};

use crate::services::{BookPipeline, CompletionClient};

/// Shared application state
///
/// Only the pipeline is shared; every request runs independently of the
/// others.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<BookPipeline>,
}

impl AppState {
    pub fn new(pipeline: BookPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Builds state around any completion backend
    pub fn with_client(client: Arc<dyn CompletionClient>, analysis_timeout: Duration) -> Self {
        Self::new(BookPipeline::new(client, analysis_timeout))
    }
}
