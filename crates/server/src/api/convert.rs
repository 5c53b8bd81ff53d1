//! Conversion API handlers.

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{error, warn};
use uuid::Uuid;

use pressa_core::{ConvertRequest, FontRequest};

use crate::state::AppState;

/// Request body for URL-based conversion
#[derive(Debug, Deserialize)]
pub struct ConvertBody {
    /// URL of the DOCX document to convert; required, but optional here so
    /// its absence maps to the 400 error envelope instead of a rejection
    #[serde(default)]
    pub docx_url: Option<String>,
    /// Fonts to download and install before conversion
    #[serde(default)]
    pub font_urls: Vec<FontRequest>,
    /// Requested name for the produced PDF
    #[serde(default)]
    pub output_filename: Option<String>,
}

/// Error response envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Convert a DOCX document referenced by URL
pub async fn convert_from_url(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ConvertBody>,
) -> Response {
    let Some(docx_url) = body.docx_url else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "missing required field: docx_url",
        );
    };

    let request = ConvertRequest {
        source_url: Some(docx_url),
        source_path: None,
        fonts: body.font_urls,
        output_filename: body.output_filename,
    };

    run_pipeline(&state, request).await
}

/// Convert an uploaded DOCX file
///
/// Expects a multipart body with a `file` part and an optional `font_urls`
/// part carrying a JSON-encoded font manifest.
pub async fn convert_uploaded_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut fonts: Vec<FontRequest> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("invalid multipart body: {}", e),
                )
            }
        };

        // The field name borrow must end before the consuming reads below
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        "file part must carry a filename",
                    );
                };
                // Reject before anything touches the disk
                if !filename.to_lowercase().ends_with(".docx") {
                    return error_response(StatusCode::BAD_REQUEST, "file must be a DOCX file");
                }
                match field.bytes().await {
                    Ok(bytes) => file = Some((filename, bytes.to_vec())),
                    Err(e) => {
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            format!("failed to read file part: {}", e),
                        )
                    }
                }
            }
            Some("font_urls") => {
                let text = match field.text().await {
                    Ok(text) => text,
                    Err(e) => {
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            format!("failed to read font_urls part: {}", e),
                        )
                    }
                };
                match serde_json::from_str::<Vec<FontRequest>>(&text) {
                    Ok(parsed) => fonts = parsed,
                    Err(_) => {
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            "invalid font_urls JSON format",
                        )
                    }
                }
            }
            _ => {}
        }
    }

    let Some((filename, bytes)) = file else {
        return error_response(StatusCode::BAD_REQUEST, "missing file part");
    };

    // Stage the upload where the pipeline can read it
    let upload_dir = state.config().converter.temp_dir.clone();
    if let Err(e) = fs::create_dir_all(&upload_dir).await {
        error!(error = %e, "Failed to create upload directory");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to store uploaded file",
        );
    }
    let upload_path = upload_dir.join(format!("upload_{}.docx", Uuid::new_v4()));
    if let Err(e) = fs::write(&upload_path, &bytes).await {
        error!(error = %e, "Failed to write uploaded file");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to store uploaded file",
        );
    }

    let stem = Path::new(&filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());

    let request = ConvertRequest {
        source_url: None,
        source_path: Some(upload_path.clone()),
        fonts,
        output_filename: Some(format!("{}_converted.pdf", stem)),
    };

    let response = run_pipeline(&state, request).await;

    // The staged upload must not outlive the request
    if let Err(e) = fs::remove_file(&upload_path).await {
        warn!(
            path = %upload_path.display(),
            error = %e,
            "Failed to remove uploaded temp file"
        );
    }

    response
}

/// Runs the pipeline and renders its outcome as an HTTP response.
async fn run_pipeline(state: &AppState, request: ConvertRequest) -> Response {
    let outcome = state.pipeline().execute(request).await;

    if let Some(failure) = outcome.failure {
        let status = if failure.kind.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        return error_response(status, failure.message);
    }

    let Some(output_path) = outcome.output_path else {
        error!("Pipeline outcome carried neither output nor failure");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
    };

    match fs::read(&output_path).await {
        Ok(bytes) => {
            let filename = output_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "converted.pdf".to_string());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!(
                path = %output_path.display(),
                error = %e,
                "Failed to read converted artifact"
            );
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to read converted artifact",
            )
        }
    }
}
