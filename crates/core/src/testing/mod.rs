//! Testing utilities and mock implementations.
//!
//! Mock implementations of the pipeline's trait seams, allowing lifecycle
//! and API tests without a LibreOffice install or network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use pressa_core::testing::{MockConverter, MockFontResolver};
//!
//! let converter = MockConverter::new();
//! let fonts = MockFontResolver::new();
//!
//! // Make the next conversion fail
//! converter.set_next_error(ConverterError::RendererNotFound).await;
//!
//! // Inspect what was requested
//! let jobs = converter.recorded_jobs().await;
//! ```

mod http;
mod mock_converter;
mod mock_font_resolver;

pub use http::spawn_http_server;
pub use mock_converter::MockConverter;
pub use mock_font_resolver::MockFontResolver;
