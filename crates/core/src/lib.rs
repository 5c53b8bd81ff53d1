pub mod config;
pub mod converter;
pub mod document;
pub mod fonts;
pub mod metrics;
pub mod pipeline;
pub mod testing;
pub mod validator;

pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use converter::{
    ConversionJob, ConversionResult, ConverterConfig, ConverterError, DocumentConverter,
    SofficeConverter,
};
pub use document::{
    Document, DocumentError, DocumentSource, DocumentStatus, DocumentStore, FontSpec,
    InMemoryDocumentStore,
};
pub use fonts::{FontError, FontResolver, FontsConfig, HttpFontResolver};
pub use pipeline::{
    ConversionOutcome, ConvertPipeline, ConvertRequest, FailureKind, FontRequest, PipelineConfig,
    PipelineFailure,
};
pub use validator::DocumentValidator;
