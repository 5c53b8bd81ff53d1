//! Error types for the fonts module.

use thiserror::Error;

/// Errors that can occur while resolving or installing fonts.
#[derive(Debug, Error)]
pub enum FontError {
    /// The font could not be downloaded (network failure or non-2xx status).
    #[error("failed to download font from {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// No font installation directory could be determined for this platform.
    #[error("no font installation directory available on this platform")]
    NoInstallDir,

    /// I/O error while caching or installing a font.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FontError {
    /// Creates a new download failed error.
    pub fn download_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DownloadFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
