//! The conversion pipeline runner.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::converter::{ConversionJob, ConverterError, DocumentConverter};
use crate::document::{Document, DocumentStore, FontSpec};
use crate::fonts::FontResolver;
use crate::metrics;
use crate::validator::DocumentValidator;

use super::config::PipelineConfig;
use super::types::{
    ConversionOutcome, ConvertRequest, FailureKind, PipelineFailure,
};

/// Drives one conversion request through validation, font resolution, and
/// conversion, tracking the document lifecycle along the way.
pub struct ConvertPipeline {
    config: PipelineConfig,
    store: Arc<dyn DocumentStore>,
    validator: DocumentValidator,
    fonts: Arc<dyn FontResolver>,
    converter: Arc<dyn DocumentConverter>,
}

impl ConvertPipeline {
    /// Creates a new pipeline with its collaborators wired in.
    pub fn new(
        config: PipelineConfig,
        store: Arc<dyn DocumentStore>,
        validator: DocumentValidator,
        fonts: Arc<dyn FontResolver>,
        converter: Arc<dyn DocumentConverter>,
    ) -> Self {
        Self {
            config,
            store,
            validator,
            fonts,
            converter,
        }
    }

    /// Executes one conversion request.
    ///
    /// Every failure is converted into a [`ConversionOutcome`]; this method
    /// never propagates an error to the caller.
    pub async fn execute(&self, request: ConvertRequest) -> ConversionOutcome {
        let start = Instant::now();
        let outcome = self.run(request).await;

        let result_label = if outcome.success { "completed" } else { "failed" };
        metrics::CONVERSIONS_TOTAL
            .with_label_values(&[result_label])
            .inc();
        metrics::CONVERSION_DURATION
            .with_label_values(&[result_label])
            .observe(start.elapsed().as_secs_f64());

        outcome
    }

    async fn run(&self, request: ConvertRequest) -> ConversionOutcome {
        // Validate the font manifest before creating anything
        let fonts = match build_font_specs(&request) {
            Ok(fonts) => fonts,
            Err(failure) => return ConversionOutcome::failed(None, failure),
        };

        let document_id = Uuid::new_v4().to_string();
        let mut document = match Document::new(
            &document_id,
            request.source_url.clone(),
            request.source_path.clone(),
            request.output_filename.clone(),
            fonts,
        ) {
            Ok(document) => document,
            Err(e) => {
                return ConversionOutcome::failed(None, PipelineFailure::validation(e.to_string()))
            }
        };

        self.store.save(document.clone());

        if !document.is_ready_for_conversion() {
            return self
                .fail(
                    &mut document,
                    PipelineFailure::validation("document is not ready for conversion"),
                )
                .await;
        }

        if let Err(e) = document.mark_processing() {
            error!(document_id = %document_id, error = %e, "Broken lifecycle transition");
            return self
                .fail(
                    &mut document,
                    PipelineFailure::new(FailureKind::Internal, "internal error"),
                )
                .await;
        }
        self.store.save(document.clone());

        // Advisory reachability check; a later download can still fail and
        // is treated as equally fatal
        if !self.validator.validate(&document).await {
            info!(document_id = %document_id, "Document validation failed");
            return self
                .fail(
                    &mut document,
                    PipelineFailure::validation("document validation failed"),
                )
                .await;
        }

        // All fonts must be resolved and installed before the renderer
        // starts: it only discovers fonts at its own startup
        for font in document.fonts().to_vec() {
            match self.fonts.resolve(&font).await {
                Ok(font_path) => {
                    if let Err(e) = self.fonts.install(&font_path).await {
                        metrics::FONT_INSTALL_FAILURES.inc();
                        warn!(
                            font = font.name(),
                            error = %e,
                            "Font install failed, continuing without it"
                        );
                    }
                }
                Err(e) => {
                    error!(font = font.name(), error = %e, "Font download failed");
                    return self
                        .fail(
                            &mut document,
                            PipelineFailure::new(
                                FailureKind::FontDownload,
                                format!("failed to download font '{}'", font.name()),
                            ),
                        )
                        .await;
                }
            }
        }

        let output_path = self.output_path_for(&document);
        let job = ConversionJob {
            job_id: document_id.clone(),
            source: document.source(),
            output_path,
        };

        match self.converter.convert(job).await {
            Ok(result) => {
                if let Err(e) = document.mark_completed(result.output_path.clone()) {
                    error!(document_id = %document_id, error = %e, "Broken lifecycle transition");
                }
                self.store.save(document.clone());
                info!(
                    document_id = %document_id,
                    output = %result.output_path.display(),
                    duration_ms = result.duration_ms,
                    "Document converted"
                );
                ConversionOutcome::completed(document_id, result.output_path)
            }
            Err(e) => {
                error!(document_id = %document_id, error = %e, "Conversion failed");
                self.fail(&mut document, conversion_failure(&e)).await
            }
        }
    }

    /// Marks the document failed, persists it, and produces the outcome.
    async fn fail(
        &self,
        document: &mut Document,
        failure: PipelineFailure,
    ) -> ConversionOutcome {
        if let Err(e) = document.mark_failed(failure.message.clone()) {
            error!(document_id = document.id(), error = %e, "Broken lifecycle transition");
        }
        self.store.save(document.clone());
        ConversionOutcome::failed(Some(document.id().to_string()), failure)
    }

    /// Joins the output directory with the requested filename, reduced to
    /// its final path component so callers cannot escape the output dir.
    fn output_path_for(&self, document: &Document) -> PathBuf {
        let filename = document
            .filename()
            .map(sanitize_filename)
            .unwrap_or_else(|| format!("converted_{}.pdf", &document.id()[..8]));
        self.config.output_dir.join(filename)
    }
}

fn sanitize_filename(requested: &str) -> String {
    Path::new(requested)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "converted.pdf".to_string())
}

fn build_font_specs(request: &ConvertRequest) -> Result<Vec<FontSpec>, PipelineFailure> {
    request
        .fonts
        .iter()
        .map(|f| {
            FontSpec::new(&f.url, &f.name)
                .map_err(|e| PipelineFailure::validation(e.to_string()))
        })
        .collect()
}

fn conversion_failure(error: &ConverterError) -> PipelineFailure {
    let kind = match error {
        ConverterError::RendererNotFound => FailureKind::RendererNotFound,
        ConverterError::Timeout { .. } => FailureKind::Timeout,
        ConverterError::OutputMissing { .. } => FailureKind::OutputMissing,
        _ => FailureKind::Conversion,
    };
    // Detail already went to the logs; the caller gets a short summary
    let message = match kind {
        FailureKind::RendererNotFound => "document renderer is not available",
        FailureKind::Timeout => "conversion timed out",
        _ => "conversion failed",
    };
    PipelineFailure::new(kind, message)
}
