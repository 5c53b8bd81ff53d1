//! Configuration for the conversion pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the conversion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory where converted artifacts are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Timeout for the source reachability probe in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join("pressa-output")
}

fn default_probe_timeout() -> u64 {
    10
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

impl PipelineConfig {
    /// Sets the output directory.
    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }
}
