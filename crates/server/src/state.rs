use std::sync::Arc;

use pressa_core::{Config, ConvertPipeline};

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: Arc<ConvertPipeline>,
}

impl AppState {
    pub fn new(config: Config, pipeline: Arc<ConvertPipeline>) -> Self {
        Self { config, pipeline }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &ConvertPipeline {
        self.pipeline.as_ref()
    }
}
