//! Mock converter for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::converter::{
    ConversionJob, ConversionResult, ConverterError, DocumentConverter,
};

/// Mock implementation of the [`DocumentConverter`] trait.
///
/// Provides controllable behavior for testing:
/// - Records every submitted job for assertions
/// - `set_next_error` makes the next conversion fail
/// - Writes a small placeholder PDF at the requested output path by default
pub struct MockConverter {
    jobs: Arc<RwLock<Vec<ConversionJob>>>,
    next_error: Arc<RwLock<Option<ConverterError>>>,
    write_output: Arc<RwLock<bool>>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            write_output: Arc::new(RwLock::new(true)),
        }
    }

    /// Makes the next `convert` call fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Controls whether `convert` writes a placeholder file at the output
    /// path (defaults to true).
    pub async fn set_write_output(&self, write_output: bool) {
        *self.write_output.write().await = write_output;
    }

    /// Returns all jobs submitted so far.
    pub async fn recorded_jobs(&self) -> Vec<ConversionJob> {
        self.jobs.read().await.clone()
    }
}

impl Clone for MockConverter {
    fn clone(&self) -> Self {
        Self {
            jobs: Arc::clone(&self.jobs),
            next_error: Arc::clone(&self.next_error),
            write_output: Arc::clone(&self.write_output),
        }
    }
}

#[async_trait]
impl DocumentConverter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError> {
        self.jobs.write().await.push(job.clone());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let output_size_bytes = if *self.write_output.read().await {
            if let Some(parent) = job.output_path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(ConverterError::Io)?;
            }
            let bytes = b"%PDF-1.4 mock converter output";
            tokio::fs::write(&job.output_path, bytes)
                .await
                .map_err(ConverterError::Io)?;
            bytes.len() as u64
        } else {
            0
        };

        Ok(ConversionResult {
            job_id: job.job_id,
            output_path: job.output_path,
            output_size_bytes,
            duration_ms: 1,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        Ok(())
    }
}
