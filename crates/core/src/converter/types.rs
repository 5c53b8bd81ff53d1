//! Data types for the converter module.

use std::path::PathBuf;

use crate::document::DocumentSource;

/// A single conversion job: one source document, one output path.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Identifier carried through for logging and result correlation.
    pub job_id: String,
    /// Where the source document comes from.
    pub source: DocumentSource,
    /// Where the produced PDF must end up.
    pub output_path: PathBuf,
}

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub job_id: String,
    /// Final location of the produced PDF.
    pub output_path: PathBuf,
    /// Size of the produced PDF in bytes.
    pub output_size_bytes: u64,
    /// Wall-clock duration of the conversion in milliseconds.
    pub duration_ms: u64,
}
