//! HTTP-backed font resolver implementation.

use async_trait::async_trait;
use regex_lite::Regex;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

use crate::document::FontSpec;
use crate::metrics;

use super::config::FontsConfig;
use super::error::FontError;

/// Resolves font descriptors to local files and installs them for the
/// renderer to discover.
#[async_trait]
pub trait FontResolver: Send + Sync {
    /// Produces a local file containing the font bytes, downloading them if
    /// they are not cached yet.
    async fn resolve(&self, font: &FontSpec) -> Result<PathBuf, FontError>;

    /// Copies a resolved font into the font-discovery directory and returns
    /// the installed path. Installed fonts are never removed.
    async fn install(&self, font_path: &Path) -> Result<PathBuf, FontError>;
}

/// Font resolver backed by reqwest and a local filesystem cache.
///
/// The cache keys on the font's logical name only: a name reused with a
/// different URL serves the previously cached bytes without refetching.
pub struct HttpFontResolver {
    client: Client,
    config: FontsConfig,
}

impl HttpFontResolver {
    /// Creates a new resolver with the given configuration.
    pub fn new(config: FontsConfig) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");
        Self { client, config }
    }

    /// Creates a resolver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(FontsConfig::default())
    }

    /// Deterministic cache path for a font's logical name.
    pub fn cache_path(&self, name: &str) -> PathBuf {
        self.config
            .cache_dir
            .join(format!("{}.ttf", sanitize_font_name(name)))
    }

    fn install_dir(&self) -> Result<PathBuf, FontError> {
        if let Some(dir) = &self.config.install_dir {
            return Ok(dir.clone());
        }
        default_install_dir().ok_or(FontError::NoInstallDir)
    }

    async fn download(&self, font: &FontSpec, dest: &Path) -> Result<(), FontError> {
        let response = self
            .client
            .get(font.url())
            .timeout(Duration::from_secs(self.config.download_timeout_secs))
            .send()
            .await
            .map_err(|e| FontError::download_failed(font.url(), e.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| FontError::download_failed(font.url(), e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FontError::download_failed(font.url(), e.to_string()))?;

        if let Err(e) = fs::write(dest, &bytes).await {
            // Don't leave a truncated font behind as a cache hit
            let _ = fs::remove_file(dest).await;
            return Err(FontError::Io(e));
        }

        Ok(())
    }
}

#[async_trait]
impl FontResolver for HttpFontResolver {
    async fn resolve(&self, font: &FontSpec) -> Result<PathBuf, FontError> {
        fs::create_dir_all(&self.config.cache_dir).await?;

        let cache_path = self.cache_path(font.name());
        if cache_path.exists() {
            debug!(font = font.name(), "Font already cached");
            metrics::FONT_RESOLUTIONS
                .with_label_values(&["cache_hit"])
                .inc();
            return Ok(cache_path);
        }

        info!(font = font.name(), url = font.url(), "Downloading font");
        match self.download(font, &cache_path).await {
            Ok(()) => {
                metrics::FONT_RESOLUTIONS
                    .with_label_values(&["downloaded"])
                    .inc();
                Ok(cache_path)
            }
            Err(e) => {
                metrics::FONT_RESOLUTIONS
                    .with_label_values(&["failed"])
                    .inc();
                Err(e)
            }
        }
    }

    async fn install(&self, font_path: &Path) -> Result<PathBuf, FontError> {
        let install_dir = self.install_dir()?;
        fs::create_dir_all(&install_dir).await?;

        let file_name = font_path
            .file_name()
            .ok_or_else(|| FontError::Io(std::io::Error::other("font path has no file name")))?;
        let dest = install_dir.join(file_name);

        if !dest.exists() {
            fs::copy(font_path, &dest).await?;
            info!(path = %dest.display(), "Font installed");
        }

        Ok(dest)
    }
}

/// Reduces a logical font name to a safe cache filename.
fn sanitize_font_name(name: &str) -> String {
    let re = Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex");
    re.replace_all(name, "_").to_string()
}

/// Platform-conventional user font directory. Windows installation requires
/// registry writes and is not supported.
fn default_install_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        return None;
    }
    #[allow(deprecated)]
    let home = std::env::home_dir()?;
    if cfg!(target_os = "macos") {
        Some(home.join("Library").join("Fonts"))
    } else {
        Some(home.join(".fonts"))
    }
}
