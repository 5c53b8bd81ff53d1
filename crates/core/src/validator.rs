//! Advisory document reachability check.
//!
//! Validation confirms that a source reference looks usable before the
//! pipeline commits resources to conversion. It is advisory, not
//! transactional: a source can disappear between validation and the actual
//! download or open, and the pipeline treats that later failure as equally
//! fatal.

use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::document::{Document, DocumentSource};

/// Default probe timeout in seconds.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Checks that a document's source reference is reachable.
pub struct DocumentValidator {
    client: Client,
    probe_timeout: Duration,
}

impl DocumentValidator {
    /// Creates a validator with the given probe timeout.
    pub fn new(probe_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            probe_timeout: Duration::from_secs(probe_timeout_secs),
        }
    }

    /// Creates a validator with the default probe timeout.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT_SECS)
    }

    /// Returns whether the document's source is considered valid.
    ///
    /// URL sources must use an http(s) scheme and answer a HEAD probe with a
    /// success status within the timeout; any network failure counts as
    /// invalid rather than an error. Path sources must exist on the local
    /// filesystem.
    pub async fn validate(&self, document: &Document) -> bool {
        match document.source() {
            DocumentSource::Url(url) => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    debug!(url = %url, "Source URL has a non-http(s) scheme");
                    return false;
                }

                match self
                    .client
                    .head(&url)
                    .timeout(self.probe_timeout)
                    .send()
                    .await
                {
                    Ok(response) => response.status().is_success(),
                    Err(e) => {
                        debug!(url = %url, error = %e, "Source URL probe failed");
                        false
                    }
                }
            }
            DocumentSource::Path(path) => path.exists(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn doc_with_url(url: &str) -> Document {
        Document::new("doc-1", Some(url.to_string()), None, None, vec![]).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_scheme_fails_before_any_network_access() {
        let validator = DocumentValidator::with_defaults();
        assert!(!validator.validate(&doc_with_url("not-a-url")).await);
        assert!(!validator.validate(&doc_with_url("ftp://example.com/a.docx")).await);
    }

    #[tokio::test]
    async fn test_unreachable_url_is_invalid_not_an_error() {
        let validator = DocumentValidator::new(1);
        // Connection refused: nothing listens on this port
        assert!(!validator.validate(&doc_with_url("http://127.0.0.1:9/a.docx")).await);
    }

    #[tokio::test]
    async fn test_existing_path_is_valid() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("doc.docx");
        tokio::fs::write(&file, b"content").await.unwrap();

        let validator = DocumentValidator::with_defaults();
        let doc = Document::new("doc-1", None, Some(file), None, vec![]).unwrap();
        assert!(validator.validate(&doc).await);
    }

    #[tokio::test]
    async fn test_missing_path_is_invalid() {
        let validator = DocumentValidator::with_defaults();
        let doc = Document::new(
            "doc-1",
            None,
            Some("/nonexistent/doc.docx".into()),
            None,
            vec![],
        )
        .unwrap();
        assert!(!validator.validate(&doc).await);
    }
}
