//! Error types for the document module.

use thiserror::Error;

use super::types::DocumentStatus;

/// Errors that can occur when constructing or transitioning a document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// Neither a source URL nor a source path was provided.
    #[error("either a source URL or a source path must be provided")]
    MissingSource,

    /// A font descriptor failed validation.
    #[error("invalid font descriptor: {reason}")]
    InvalidFont { reason: String },

    /// A status transition that the state machine does not permit.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: DocumentStatus,
        to: DocumentStatus,
    },

    /// Marking a document failed requires a reason.
    #[error("a failure reason is required to mark a document as failed")]
    MissingFailureReason,
}

impl DocumentError {
    /// Creates a new invalid font error.
    pub fn invalid_font(reason: impl Into<String>) -> Self {
        Self::InvalidFont {
            reason: reason.into(),
        }
    }
}
