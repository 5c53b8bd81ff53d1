//! Configuration for the fonts module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the HTTP font resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontsConfig {
    /// Directory where downloaded fonts are cached.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Timeout for a single font download in seconds.
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// Override for the font installation directory. When unset, the
    /// platform-conventional user font directory is used.
    #[serde(default)]
    pub install_dir: Option<PathBuf>,
}

fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("pressa-fonts")
}

fn default_download_timeout() -> u64 {
    30
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            download_timeout_secs: default_download_timeout(),
            install_dir: None,
        }
    }
}

impl FontsConfig {
    /// Sets the cache directory.
    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.cache_dir = cache_dir;
        self
    }

    /// Sets the install directory override.
    pub fn with_install_dir(mut self, install_dir: PathBuf) -> Self {
        self.install_dir = Some(install_dir);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FontsConfig::default();
        assert_eq!(config.download_timeout_secs, 30);
        assert!(config.install_dir.is_none());
        assert!(config.cache_dir.ends_with("pressa-fonts"));
    }

    #[test]
    fn test_config_builder() {
        let config = FontsConfig::default()
            .with_cache_dir(PathBuf::from("/tmp/cache"))
            .with_install_dir(PathBuf::from("/tmp/install"));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(config.install_dir, Some(PathBuf::from("/tmp/install")));
    }
}
