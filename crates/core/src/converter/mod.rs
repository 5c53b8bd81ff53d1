//! Converter module for rendering documents to PDF.
//!
//! This module provides the [`DocumentConverter`] trait and the
//! LibreOffice-based implementation that does the actual DOCX to PDF
//! rendering by driving `soffice` in headless batch mode.
//!
//! # Example
//!
//! ```ignore
//! use pressa_core::converter::{SofficeConverter, DocumentConverter, ConversionJob};
//! use pressa_core::document::DocumentSource;
//!
//! let converter = SofficeConverter::with_defaults();
//!
//! // Check the renderer is available
//! converter.validate().await?;
//!
//! let job = ConversionJob {
//!     job_id: "job-1".to_string(),
//!     source: DocumentSource::Path(PathBuf::from("/path/to/input.docx")),
//!     output_path: PathBuf::from("/path/to/output.pdf"),
//! };
//!
//! let result = converter.convert(job).await?;
//! println!("Converted in {} ms", result.duration_ms);
//! ```

mod config;
mod error;
mod soffice;
mod traits;
mod types;

pub use config::ConverterConfig;
pub use error::ConverterError;
pub use soffice::SofficeConverter;
pub use traits::DocumentConverter;
pub use types::{ConversionJob, ConversionResult};
