//! Binary entry point for the face recognition service.
//!
//! Wires the production backends (in-memory image decoder, remote face
//! predictor) into the orchestrator and serves the HTTP app.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use predictor_client::RemotePredictor;
use recognition::InMemoryDecoder;
use server::app::DEFAULT_MAX_UPLOAD_BYTES;
use server::{create_app, RecognitionOrchestrator};

/// Face recognition HTTP service
#[derive(Parser)]
#[command(name = "face-recognition-server")]
#[command(about = "HTTP endpoint that recognizes faces in uploaded images", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    listen: SocketAddr,

    /// Base URL of the face prediction service
    #[arg(long, default_value = "http://localhost:5001")]
    predictor_url: String,

    /// Maximum accepted request body size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info,server=debug,recognition=debug,predictor_client=debug")
        .init();

    let cli = Cli::parse();

    info!("Starting face recognition server");
    let predictor =
        RemotePredictor::connect(&cli.predictor_url).context("Invalid predictor URL")?;
    let orchestrator =
        RecognitionOrchestrator::new(Arc::new(InMemoryDecoder), Arc::new(predictor));
    let app = create_app(orchestrator, cli.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("Failed to bind {}", cli.listen))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
