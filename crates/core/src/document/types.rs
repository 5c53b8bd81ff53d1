//! Core document data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::DocumentError;

/// Processing status of a conversion request.
///
/// State machine flow:
/// ```text
/// Pending -> Processing -> Completed
///               |
///               v
///            Failed
/// ```
///
/// Transitions are forward-only; terminal states permit no further moves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Created, nothing attempted yet.
    Pending,
    /// Validation and conversion in progress.
    Processing,
    /// Converted successfully (terminal).
    Completed,
    /// Conversion failed (terminal).
    Failed,
}

impl DocumentStatus {
    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::Failed)
    }

    /// Returns the status as a string (for logs and filtering).
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Completed => "completed",
            DocumentStatus::Failed => "failed",
        }
    }

    fn can_transition_to(&self, next: DocumentStatus) -> bool {
        matches!(
            (self, next),
            (DocumentStatus::Pending, DocumentStatus::Processing)
                | (DocumentStatus::Processing, DocumentStatus::Completed)
                | (DocumentStatus::Pending, DocumentStatus::Failed)
                | (DocumentStatus::Processing, DocumentStatus::Failed)
        )
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable font descriptor: where to fetch the font and its logical name.
///
/// Both fields are validated at construction and never change afterwards.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FontSpec {
    url: String,
    name: String,
}

impl FontSpec {
    /// Creates a font spec, validating that both fields are non-empty and
    /// that the URL uses an HTTP or HTTPS scheme.
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Result<Self, DocumentError> {
        let url = url.into();
        let name = name.into();

        if url.is_empty() || name.is_empty() {
            return Err(DocumentError::invalid_font(
                "font URL and name are required",
            ));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(DocumentError::invalid_font(format!(
                "font URL must use an HTTP or HTTPS scheme: {}",
                url
            )));
        }

        Ok(Self { url, name })
    }

    /// The URL to download the font from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The logical name of the font, used as the cache key.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The resolved source of a document: remote URL or local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Remote document fetched over HTTP(S).
    Url(String),
    /// Document already present on the local filesystem.
    Path(PathBuf),
}

/// A conversion request record, owned by the pipeline for the duration of
/// one request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Document {
    id: String,
    source_url: Option<String>,
    source_path: Option<PathBuf>,
    filename: Option<String>,
    fonts: Vec<FontSpec>,
    status: DocumentStatus,
    output_path: Option<PathBuf>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Document {
    /// Creates a new document in the `Pending` state.
    ///
    /// At least one of `source_url` and `source_path` must be set; when both
    /// are present the URL takes priority.
    pub fn new(
        id: impl Into<String>,
        source_url: Option<String>,
        source_path: Option<PathBuf>,
        filename: Option<String>,
        fonts: Vec<FontSpec>,
    ) -> Result<Self, DocumentError> {
        if source_url.is_none() && source_path.is_none() {
            return Err(DocumentError::MissingSource);
        }

        let now = Utc::now();
        Ok(Self {
            id: id.into(),
            source_url,
            source_path,
            filename,
            fonts,
            status: DocumentStatus::Pending,
            output_path: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn fonts(&self) -> &[FontSpec] {
        &self.fonts
    }

    /// Requested output filename, if the caller provided one.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Output artifact path, set only once the document is `Completed`.
    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Failure reason, set only once the document is `Failed`.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The document source; the URL wins when both are set.
    pub fn source(&self) -> DocumentSource {
        match (&self.source_url, &self.source_path) {
            (Some(url), _) => DocumentSource::Url(url.clone()),
            (None, Some(path)) => DocumentSource::Path(path.clone()),
            (None, None) => unreachable!("constructor enforces at least one source"),
        }
    }

    /// True only in `Pending` with a source reference present.
    pub fn is_ready_for_conversion(&self) -> bool {
        self.status == DocumentStatus::Pending
            && (self.source_url.is_some() || self.source_path.is_some())
    }

    fn transition(&mut self, next: DocumentStatus) -> Result<(), DocumentError> {
        if !self.status.can_transition_to(next) {
            return Err(DocumentError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Marks the document as being processed.
    pub fn mark_processing(&mut self) -> Result<(), DocumentError> {
        self.transition(DocumentStatus::Processing)
    }

    /// Marks the document as completed with the produced artifact path.
    pub fn mark_completed(&mut self, output_path: PathBuf) -> Result<(), DocumentError> {
        self.transition(DocumentStatus::Completed)?;
        self.output_path = Some(output_path);
        Ok(())
    }

    /// Marks the document as failed with a non-empty reason.
    pub fn mark_failed(&mut self, error_message: impl Into<String>) -> Result<(), DocumentError> {
        let error_message = error_message.into();
        if error_message.is_empty() {
            return Err(DocumentError::MissingFailureReason);
        }
        self.transition(DocumentStatus::Failed)?;
        self.error_message = Some(error_message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_doc() -> Document {
        Document::new(
            "doc-1",
            Some("https://example.com/file.docx".to_string()),
            None,
            None,
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_document_requires_a_source() {
        let result = Document::new("doc-1", None, None, None, vec![]);
        assert_eq!(result.unwrap_err(), DocumentError::MissingSource);
    }

    #[test]
    fn test_document_with_path_source() {
        let doc = Document::new(
            "doc-1",
            None,
            Some(PathBuf::from("/tmp/file.docx")),
            None,
            vec![],
        )
        .unwrap();
        assert_eq!(
            doc.source(),
            DocumentSource::Path(PathBuf::from("/tmp/file.docx"))
        );
    }

    #[test]
    fn test_url_wins_when_both_sources_set() {
        let doc = Document::new(
            "doc-1",
            Some("https://example.com/a.docx".to_string()),
            Some(PathBuf::from("/tmp/b.docx")),
            None,
            vec![],
        )
        .unwrap();
        assert_eq!(
            doc.source(),
            DocumentSource::Url("https://example.com/a.docx".to_string())
        );
    }

    #[test]
    fn test_new_document_is_ready_for_conversion() {
        let doc = pending_doc();
        assert_eq!(doc.status(), DocumentStatus::Pending);
        assert!(doc.is_ready_for_conversion());
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut doc = pending_doc();
        doc.mark_processing().unwrap();
        assert_eq!(doc.status(), DocumentStatus::Processing);
        assert!(!doc.is_ready_for_conversion());

        doc.mark_completed(PathBuf::from("/out/result.pdf")).unwrap();
        assert_eq!(doc.status(), DocumentStatus::Completed);
        assert_eq!(doc.output_path(), Some(Path::new("/out/result.pdf")));
        assert!(doc.error_message().is_none());
    }

    #[test]
    fn test_failure_transitions() {
        let mut doc = pending_doc();
        doc.mark_processing().unwrap();
        doc.mark_failed("renderer exploded").unwrap();
        assert_eq!(doc.status(), DocumentStatus::Failed);
        assert_eq!(doc.error_message(), Some("renderer exploded"));
        assert!(doc.output_path().is_none());
    }

    #[test]
    fn test_can_fail_directly_from_pending() {
        let mut doc = pending_doc();
        doc.mark_failed("validation failed").unwrap();
        assert_eq!(doc.status(), DocumentStatus::Failed);
    }

    #[test]
    fn test_cannot_complete_from_pending() {
        let mut doc = pending_doc();
        let err = doc.mark_completed(PathBuf::from("/out/x.pdf")).unwrap_err();
        assert_eq!(
            err,
            DocumentError::InvalidTransition {
                from: DocumentStatus::Pending,
                to: DocumentStatus::Completed,
            }
        );
    }

    #[test]
    fn test_terminal_states_reject_transitions() {
        let mut doc = pending_doc();
        doc.mark_processing().unwrap();
        doc.mark_completed(PathBuf::from("/out/x.pdf")).unwrap();

        assert!(doc.mark_processing().is_err());
        assert!(doc.mark_failed("too late").is_err());
        assert!(doc.mark_completed(PathBuf::from("/out/y.pdf")).is_err());
        // Output path is untouched by the rejected transition
        assert_eq!(doc.output_path(), Some(Path::new("/out/x.pdf")));
    }

    #[test]
    fn test_failed_is_terminal() {
        let mut doc = pending_doc();
        doc.mark_failed("gone wrong").unwrap();
        assert!(doc.mark_processing().is_err());
        assert!(doc.mark_completed(PathBuf::from("/out/x.pdf")).is_err());
    }

    #[test]
    fn test_mark_failed_requires_a_reason() {
        let mut doc = pending_doc();
        assert_eq!(
            doc.mark_failed("").unwrap_err(),
            DocumentError::MissingFailureReason
        );
        // The rejected call must not have moved the status
        assert_eq!(doc.status(), DocumentStatus::Pending);
    }

    #[test]
    fn test_font_spec_validation() {
        assert!(FontSpec::new("https://fonts.example.com/r.ttf", "Roboto").is_ok());
        assert!(FontSpec::new("http://fonts.example.com/r.ttf", "Roboto").is_ok());

        assert!(matches!(
            FontSpec::new("ftp://fonts.example.com/r.ttf", "Roboto"),
            Err(DocumentError::InvalidFont { .. })
        ));
        assert!(matches!(
            FontSpec::new("not-a-url", "Roboto"),
            Err(DocumentError::InvalidFont { .. })
        ));
        assert!(matches!(
            FontSpec::new("", "Roboto"),
            Err(DocumentError::InvalidFont { .. })
        ));
        assert!(matches!(
            FontSpec::new("https://fonts.example.com/r.ttf", ""),
            Err(DocumentError::InvalidFont { .. })
        ));
    }

    #[test]
    fn test_status_is_terminal() {
        assert!(!DocumentStatus::Pending.is_terminal());
        assert!(!DocumentStatus::Processing.is_terminal());
        assert!(DocumentStatus::Completed.is_terminal());
        assert!(DocumentStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&DocumentStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let parsed: DocumentStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, DocumentStatus::Completed);
    }
}
