//! Conversion API tests.
//!
//! These run the router in-process with a mock converter and font resolver,
//! so no LibreOffice install or outbound network access is needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use pressa_core::testing::{spawn_http_server, MockConverter, MockFontResolver};
use pressa_core::{
    Config, ConvertPipeline, DocumentStore, DocumentValidator, InMemoryDocumentStore,
    PipelineConfig,
};
use pressa_server::{create_router, AppState};

/// Test fixture: an in-process router with mock pipeline collaborators.
struct TestFixture {
    router: Router,
    converter: MockConverter,
    fonts: MockFontResolver,
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = Config::default();
        config.converter.temp_dir = temp_dir.path().join("uploads");
        config.pipeline.output_dir = temp_dir.path().join("output");
        config.pipeline.probe_timeout_secs = 1;

        let converter = MockConverter::new();
        let fonts = MockFontResolver::new();
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());

        let pipeline_config = PipelineConfig {
            output_dir: config.pipeline.output_dir.clone(),
            probe_timeout_secs: config.pipeline.probe_timeout_secs,
        };
        let pipeline = Arc::new(ConvertPipeline::new(
            pipeline_config,
            store,
            DocumentValidator::new(1),
            Arc::new(fonts.clone()),
            Arc::new(converter.clone()),
        ));

        let state = Arc::new(AppState::new(config, pipeline));

        Self {
            router: create_router(state),
            converter,
            fonts,
            temp_dir,
        }
    }

    async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn post_multipart(&self, uri: &str, body: String) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        (status, bytes)
    }

    /// Number of files currently staged in the upload directory.
    fn staged_uploads(&self) -> usize {
        std::fs::read_dir(self.temp_dir.path().join("uploads"))
            .map(|d| d.count())
            .unwrap_or(0)
    }
}

const BOUNDARY: &str = "test-boundary-7f2a91";

fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
    let mut body = String::new();
    for (name, filename, content) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\r\n",
                name, filename
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

fn parse_error(bytes: &[u8]) -> String {
    let value: Value = serde_json::from_slice(bytes).expect("error body should be JSON");
    value["error"].as_str().expect("error field").to_string()
}

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();
    let (status, body) = fixture.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["status"], "ok");
    assert_eq!(value["service"], "pressa");
    assert!(value["version"].as_str().is_some());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    // A completed request first, so the request counter has something to show
    let (status, _) = fixture.get("/health").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = fixture.get("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("pressa_http_requests_total"));
}

#[tokio::test]
async fn test_convert_rejects_missing_docx_url() {
    let fixture = TestFixture::new();
    let (status, body) = fixture.post_json("/convert", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(parse_error(&body).contains("docx_url"));
    assert!(fixture.converter.recorded_jobs().await.is_empty());
}

#[tokio::test]
async fn test_convert_rejects_malformed_url_before_any_work() {
    let fixture = TestFixture::new();
    let (status, body) = fixture
        .post_json("/convert", json!({ "docx_url": "not-a-url" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!parse_error(&body).is_empty());
    // Neither fonts nor conversion ran
    assert!(fixture.fonts.resolved_fonts().await.is_empty());
    assert!(fixture.converter.recorded_jobs().await.is_empty());
}

#[tokio::test]
async fn test_convert_unreachable_url_is_a_400() {
    let fixture = TestFixture::new();
    // Connection refused: nothing listens on this port
    let (status, _) = fixture
        .post_json("/convert", json!({ "docx_url": "http://127.0.0.1:9/x.docx" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(fixture.converter.recorded_jobs().await.is_empty());
}

#[tokio::test]
async fn test_convert_reachable_url_returns_pdf() {
    let fixture = TestFixture::new();
    let (url, server) = spawn_http_server(b"docx bytes".to_vec()).await;

    let (status, body) = fixture
        .post_json(
            "/convert",
            json!({
                "docx_url": format!("{}/x.docx", url),
                "font_urls": [],
                "output_filename": "out.pdf"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with(b"%PDF"));

    server.abort();
}

#[tokio::test]
async fn test_convert_with_fonts_resolves_them_first() {
    let fixture = TestFixture::new();
    let (url, server) = spawn_http_server(b"docx bytes".to_vec()).await;

    let (status, _) = fixture
        .post_json(
            "/convert",
            json!({
                "docx_url": format!("{}/x.docx", url),
                "font_urls": [
                    { "url": "https://fonts.example.com/roboto.ttf", "name": "Roboto" }
                ]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let resolved = fixture.fonts.resolved_fonts().await;
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].name(), "Roboto");

    server.abort();
}

#[tokio::test]
async fn test_convert_renderer_failure_is_a_500() {
    let fixture = TestFixture::new();
    let (url, server) = spawn_http_server(b"docx bytes".to_vec()).await;
    fixture
        .converter
        .set_next_error(pressa_core::ConverterError::RendererNotFound)
        .await;

    let (status, body) = fixture
        .post_json("/convert", json!({ "docx_url": format!("{}/x.docx", url) }))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!parse_error(&body).is_empty());

    server.abort();
}

#[tokio::test]
async fn test_convert_file_rejects_non_docx_before_staging() {
    let fixture = TestFixture::new();
    let body = multipart_body(&[("file", Some("notes.txt"), "plain text content")]);

    let (status, response) = fixture.post_multipart("/convert-file", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(parse_error(&response).contains("DOCX"));
    // Rejected before any temp file was created
    assert_eq!(fixture.staged_uploads(), 0);
    assert!(fixture.converter.recorded_jobs().await.is_empty());
}

#[tokio::test]
async fn test_convert_file_rejects_missing_file_part() {
    let fixture = TestFixture::new();
    let body = multipart_body(&[("font_urls", None, "[]")]);

    let (status, response) = fixture.post_multipart("/convert-file", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(parse_error(&response).contains("file"));
}

#[tokio::test]
async fn test_convert_file_rejects_invalid_font_manifest() {
    let fixture = TestFixture::new();
    let body = multipart_body(&[
        ("file", Some("document.docx"), "docx bytes"),
        ("font_urls", None, "this is not json"),
    ]);

    let (status, response) = fixture.post_multipart("/convert-file", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(parse_error(&response).contains("font_urls"));
}

#[tokio::test]
async fn test_convert_file_returns_pdf_and_cleans_up() {
    let fixture = TestFixture::new();
    let body = multipart_body(&[
        ("file", Some("report.docx"), "docx bytes"),
        ("font_urls", None, "[]"),
    ]);

    let (status, response) = fixture.post_multipart("/convert-file", body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(response.starts_with(b"%PDF"));

    // The output name derives from the uploaded filename
    let jobs = fixture.converter.recorded_jobs().await;
    assert_eq!(jobs.len(), 1);
    assert!(jobs[0].output_path.ends_with("report_converted.pdf"));

    // The staged upload was removed after the request
    assert_eq!(fixture.staged_uploads(), 0);
}
