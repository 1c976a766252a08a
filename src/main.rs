//! Mushroom Inference Service - Main Entry Point
//!
//! Loads the model bundle, then serves the configured request surface
//! over HTTP. Artifact loading happens before the listener binds: a
//! missing or corrupt bundle means the process never accepts traffic.

use anyhow::Result;
use mushroom_service::{
    config::AppConfig,
    metrics::{MetricsReporter, ServiceMetrics},
    models::inference::PredictionService,
    models::loader::ArtifactLoader,
    server::{self, AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mushroom_service=info".parse()?),
        )
        .init();

    info!("Starting Mushroom Inference Service");

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        surface = ?config.server.surface,
        artifacts = %config.artifacts.dir,
        "Configuration loaded successfully"
    );

    // Load the model bundle; fatal if missing or corrupt
    let loader = ArtifactLoader::with_threads(config.artifacts.onnx_threads)?;
    let artifact = Arc::new(loader.load(&config.artifacts.dir)?);
    info!("Model artifact loaded: preprocessor + classifier ready");

    let predictor = Arc::new(PredictionService::new(artifact));
    let metrics = Arc::new(ServiceMetrics::new());

    // Start metrics reporter (logs a summary every 60 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 60);
        reporter.start().await;
    });

    let state = AppState::new(predictor, metrics);
    let app = server::router(state, config.server.surface);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, surface = ?config.server.surface, "Listening");

    axum::serve(listener, app).await?;

    Ok(())
}
