//! LibreOffice-based converter implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::document::DocumentSource;

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::DocumentConverter;
use super::types::{ConversionJob, ConversionResult};

/// LibreOffice-based converter implementation.
///
/// Renderer invocations are serialised behind a mutex: headless soffice
/// instances share a user profile directory and cannot run concurrently.
pub struct SofficeConverter {
    config: ConverterConfig,
    client: Client,
    renderer_lock: Mutex<()>,
}

impl SofficeConverter {
    /// Creates a new converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");
        Self {
            config,
            client,
            renderer_lock: Mutex::new(()),
        }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// Locates the renderer executable without spawning anything.
    ///
    /// An explicit `soffice_path` override is authoritative: when it is set
    /// and missing, there is no fallback. Otherwise platform-conventional
    /// install locations are checked first, then every directory on `PATH`.
    fn locate_renderer(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config.soffice_path {
            return path.exists().then(|| path.clone());
        }

        for candidate in platform_candidates() {
            if candidate.exists() {
                return Some(candidate);
            }
        }

        let path_var = env::var_os("PATH")?;
        for dir in env::split_paths(&path_var) {
            for name in renderer_names() {
                let candidate = dir.join(name);
                if candidate.exists() {
                    return Some(candidate);
                }
            }
        }

        None
    }

    /// Downloads a remote source document to a temporary local file.
    async fn download_source(&self, url: &str) -> Result<PathBuf, ConverterError> {
        fs::create_dir_all(&self.config.temp_dir).await?;
        let path = self.config.temp_dir.join(format!("{}.docx", Uuid::new_v4()));

        debug!(url = %url, "Downloading source document");
        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(self.config.download_timeout_secs))
            .send()
            .await
            .map_err(|e| ConverterError::download_failed(url, e.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| ConverterError::download_failed(url, e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ConverterError::download_failed(url, e.to_string()))?;

        if let Err(e) = fs::write(&path, &bytes).await {
            let _ = fs::remove_file(&path).await;
            return Err(ConverterError::Io(e));
        }

        Ok(path)
    }

    /// Runs the renderer against a local input file and relocates the
    /// produced PDF to the requested output path.
    async fn run_renderer(
        &self,
        renderer: &Path,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<PathBuf, ConverterError> {
        let output_dir = output_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        // One headless instance at a time; the profile is shared
        let _guard = self.renderer_lock.lock().await;

        debug!(
            renderer = %renderer.display(),
            input = %input_path.display(),
            "Invoking renderer"
        );

        let mut child = Command::new(renderer)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(&output_dir)
            .arg(input_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stderr = child.stderr.take().expect("stderr should be captured");

        let timeout_duration = Duration::from_secs(self.config.convert_timeout_secs);
        let result = timeout(timeout_duration, async {
            let mut stderr_output = String::new();
            stderr.read_to_string(&mut stderr_output).await?;
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stderr_output))
        })
        .await;

        match result {
            Ok(Ok((status, stderr_output))) => {
                if !status.success() {
                    return Err(ConverterError::conversion_failed(
                        format!("renderer exited with code {:?}", status.code()),
                        (!stderr_output.is_empty()).then_some(stderr_output),
                    ));
                }
                if !stderr_output.is_empty() {
                    debug!(stderr = %stderr_output.trim(), "Renderer diagnostics");
                }
            }
            Ok(Err(e)) => return Err(ConverterError::Io(e)),
            Err(_) => {
                // The subprocess must not outlive the timeout
                let _ = child.kill().await;
                return Err(ConverterError::Timeout {
                    timeout_secs: self.config.convert_timeout_secs,
                });
            }
        }

        // The renderer names its output after the input stem, not after the
        // caller's requested filename; a clean exit alone proves nothing.
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let produced = output_dir.join(format!("{}.pdf", stem));

        if !produced.exists() {
            return Err(ConverterError::OutputMissing { path: produced });
        }

        if produced.as_path() != output_path {
            move_file(&produced, output_path).await?;
        }

        Ok(output_path.to_path_buf())
    }
}

#[async_trait]
impl DocumentConverter for SofficeConverter {
    fn name(&self) -> &str {
        "soffice"
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError> {
        let start = Instant::now();

        let renderer = self
            .locate_renderer()
            .ok_or(ConverterError::RendererNotFound)?;

        if let Some(parent) = job.output_path.parent() {
            fs::create_dir_all(parent).await.map_err(|_| {
                ConverterError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                }
            })?;
        }

        let (input_path, temp_download) = match &job.source {
            DocumentSource::Path(path) => (path.clone(), None),
            DocumentSource::Url(url) => {
                let path = self.download_source(url).await?;
                (path.clone(), Some(path))
            }
        };

        let rendered = self
            .run_renderer(&renderer, &input_path, &job.output_path)
            .await;

        // The downloaded temp file must not survive the call, whatever the outcome
        if let Some(temp_path) = temp_download {
            if let Err(e) = fs::remove_file(&temp_path).await {
                warn!(
                    path = %temp_path.display(),
                    error = %e,
                    "Failed to remove temporary source file"
                );
            }
        }

        let output_path = rendered?;
        let output_meta = fs::metadata(&output_path).await?;

        info!(
            job_id = %job.job_id,
            output = %output_path.display(),
            "Conversion completed"
        );

        Ok(ConversionResult {
            job_id: job.job_id,
            output_path,
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if self.locate_renderer().is_none() {
            return Err(ConverterError::RendererNotFound);
        }
        fs::create_dir_all(&self.config.temp_dir).await?;
        Ok(())
    }
}

/// Moves a file, falling back to copy-and-remove across filesystems.
async fn move_file(source: &Path, destination: &Path) -> Result<(), ConverterError> {
    match fs::rename(source, destination).await {
        Ok(()) => Ok(()),
        Err(e) => {
            // Cross-filesystem renames fail with EXDEV (18 on Linux)
            if e.kind() == std::io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) {
                fs::copy(source, destination).await?;
                let _ = fs::remove_file(source).await;
                Ok(())
            } else {
                Err(ConverterError::Io(e))
            }
        }
    }
}

fn renderer_names() -> &'static [&'static str] {
    if cfg!(windows) {
        &["soffice.exe"]
    } else {
        &["soffice", "libreoffice"]
    }
}

fn platform_candidates() -> Vec<PathBuf> {
    if cfg!(target_os = "macos") {
        vec![
            PathBuf::from("/Applications/LibreOffice.app/Contents/MacOS/soffice"),
            PathBuf::from("/usr/local/bin/soffice"),
            PathBuf::from("/opt/homebrew/bin/soffice"),
        ]
    } else if cfg!(windows) {
        vec![
            PathBuf::from(r"C:\Program Files\LibreOffice\program\soffice.exe"),
            PathBuf::from(r"C:\Program Files (x86)\LibreOffice\program\soffice.exe"),
        ]
    } else {
        vec![
            PathBuf::from("/usr/bin/soffice"),
            PathBuf::from("/usr/bin/libreoffice"),
            PathBuf::from("/usr/local/bin/libreoffice"),
            PathBuf::from("/snap/bin/libreoffice"),
        ]
    }
}
