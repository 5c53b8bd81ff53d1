//! Request and outcome types for the conversion pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A caller-supplied font manifest entry, not yet validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FontRequest {
    pub url: String,
    pub name: String,
}

/// A conversion request as it arrives from the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct ConvertRequest {
    /// Remote source document URL.
    pub source_url: Option<String>,
    /// Local source document path (uploaded file).
    pub source_path: Option<PathBuf>,
    /// Fonts to resolve before conversion.
    pub fonts: Vec<FontRequest>,
    /// Requested output filename; a generated name is used when absent.
    pub output_filename: Option<String>,
}

/// Classification of a pipeline failure, used by the presentation layer to
/// pick a status code.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Bad or unreachable input reference, bad font descriptor.
    Validation,
    /// A font could not be downloaded.
    FontDownload,
    /// The renderer executable could not be located.
    RendererNotFound,
    /// The renderer exceeded its wall-clock timeout.
    Timeout,
    /// The renderer reported success but produced no output.
    OutputMissing,
    /// The renderer or source download failed.
    Conversion,
    /// Anything else.
    Internal,
}

impl FailureKind {
    /// Whether the failure is the caller's fault (4xx rather than 5xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, FailureKind::Validation)
    }
}

/// A pipeline failure: a kind for status mapping and a caller-safe message.
/// Full diagnostic detail goes to the logs, not here.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PipelineFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl PipelineFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Validation, message)
    }
}

/// The outcome of one conversion request.
///
/// Exactly one of `output_path` and `failure` is populated.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub success: bool,
    /// Identity of the document record, when one was created.
    pub document_id: Option<String>,
    /// Path of the produced artifact; present iff `success`.
    pub output_path: Option<PathBuf>,
    /// Failure details; present iff not `success`.
    pub failure: Option<PipelineFailure>,
}

impl ConversionOutcome {
    /// A successful outcome with the produced artifact path.
    pub fn completed(document_id: impl Into<String>, output_path: PathBuf) -> Self {
        Self {
            success: true,
            document_id: Some(document_id.into()),
            output_path: Some(output_path),
            failure: None,
        }
    }

    /// A failed outcome.
    pub fn failed(document_id: Option<String>, failure: PipelineFailure) -> Self {
        Self {
            success: false,
            document_id,
            output_path: None,
            failure: Some(failure),
        }
    }
}
