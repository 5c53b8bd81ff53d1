use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pressa_core::{
    load_config, validate_config, Config, ConvertPipeline, DocumentConverter, DocumentStore,
    DocumentValidator, FontResolver, HttpFontResolver, InMemoryDocumentStore, SofficeConverter,
};

use pressa_server::{create_router, AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("PRESSA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration; every section has defaults, so a missing file
    // just means default configuration
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!("No config file at {:?}, using defaults", config_path);
        Config::default()
    };

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Output directory: {:?}", config.pipeline.output_dir);
    info!("Font cache directory: {:?}", config.fonts.cache_dir);

    // Wire the pipeline's dependency graph once, at startup
    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
    let fonts: Arc<dyn FontResolver> = Arc::new(HttpFontResolver::new(config.fonts.clone()));
    let validator = DocumentValidator::new(config.pipeline.probe_timeout_secs);

    let converter = SofficeConverter::new(config.converter.clone());
    match converter.validate().await {
        Ok(()) => info!("Renderer check passed"),
        Err(e) => warn!(
            "Renderer check failed ({}); conversion requests will fail until it is resolved",
            e
        ),
    }
    let converter: Arc<dyn DocumentConverter> = Arc::new(converter);

    let pipeline = Arc::new(ConvertPipeline::new(
        config.pipeline.clone(),
        store,
        validator,
        fonts,
        converter,
    ));

    // Create app state and router
    let state = Arc::new(AppState::new(config.clone(), pipeline));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
