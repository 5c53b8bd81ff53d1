//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the LibreOffice-based converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Explicit path to the soffice binary. When set, only this path is
    /// used; when unset, platform-conventional locations and `PATH` are
    /// searched.
    #[serde(default)]
    pub soffice_path: Option<PathBuf>,

    /// Temporary directory for downloaded source documents.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Hard wall-clock timeout for a single renderer invocation in seconds.
    #[serde(default = "default_convert_timeout")]
    pub convert_timeout_secs: u64,

    /// Timeout for downloading a remote source document in seconds.
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("pressa-convert")
}

fn default_convert_timeout() -> u64 {
    60
}

fn default_download_timeout() -> u64 {
    60
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            soffice_path: None,
            temp_dir: default_temp_dir(),
            convert_timeout_secs: default_convert_timeout(),
            download_timeout_secs: default_download_timeout(),
        }
    }
}

impl ConverterConfig {
    /// Creates a config with an explicit soffice path.
    pub fn with_soffice_path(soffice_path: PathBuf) -> Self {
        Self {
            soffice_path: Some(soffice_path),
            ..Default::default()
        }
    }

    /// Sets the temp directory.
    pub fn with_temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Sets the conversion timeout in seconds.
    pub fn with_convert_timeout(mut self, timeout_secs: u64) -> Self {
        self.convert_timeout_secs = timeout_secs;
        self
    }
}
