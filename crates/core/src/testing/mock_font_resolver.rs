//! Mock font resolver for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::document::FontSpec;
use crate::fonts::{FontError, FontResolver};

/// Mock implementation of the [`FontResolver`] trait.
///
/// Resolution never touches the network; resolved paths are fabricated from
/// the font name. Calls are recorded for ordering and count assertions.
pub struct MockFontResolver {
    resolved: Arc<RwLock<Vec<FontSpec>>>,
    installed: Arc<RwLock<Vec<PathBuf>>>,
    next_resolve_error: Arc<RwLock<Option<FontError>>>,
    fail_installs: Arc<RwLock<bool>>,
}

impl Default for MockFontResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFontResolver {
    pub fn new() -> Self {
        Self {
            resolved: Arc::new(RwLock::new(Vec::new())),
            installed: Arc::new(RwLock::new(Vec::new())),
            next_resolve_error: Arc::new(RwLock::new(None)),
            fail_installs: Arc::new(RwLock::new(false)),
        }
    }

    /// Makes the next `resolve` call fail with the given error.
    pub async fn set_next_resolve_error(&self, error: FontError) {
        *self.next_resolve_error.write().await = Some(error);
    }

    /// Makes every `install` call fail (fonts installs are best-effort, so
    /// this exercises the swallow-and-log path).
    pub async fn set_fail_installs(&self, fail: bool) {
        *self.fail_installs.write().await = fail;
    }

    /// Fonts resolved so far, in call order.
    pub async fn resolved_fonts(&self) -> Vec<FontSpec> {
        self.resolved.read().await.clone()
    }

    /// Font paths installed so far, in call order.
    pub async fn installed_paths(&self) -> Vec<PathBuf> {
        self.installed.read().await.clone()
    }
}

impl Clone for MockFontResolver {
    fn clone(&self) -> Self {
        Self {
            resolved: Arc::clone(&self.resolved),
            installed: Arc::clone(&self.installed),
            next_resolve_error: Arc::clone(&self.next_resolve_error),
            fail_installs: Arc::clone(&self.fail_installs),
        }
    }
}

#[async_trait]
impl FontResolver for MockFontResolver {
    async fn resolve(&self, font: &FontSpec) -> Result<PathBuf, FontError> {
        if let Some(error) = self.next_resolve_error.write().await.take() {
            return Err(error);
        }
        self.resolved.write().await.push(font.clone());
        Ok(std::env::temp_dir().join(format!("{}.ttf", font.name())))
    }

    async fn install(&self, font_path: &Path) -> Result<PathBuf, FontError> {
        if *self.fail_installs.read().await {
            return Err(FontError::NoInstallDir);
        }
        self.installed.write().await.push(font_path.to_path_buf());
        Ok(font_path.to_path_buf())
    }
}
