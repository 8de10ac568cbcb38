//! IntelliView API server.
//!
//! This is the application entry point. It loads configuration from an
//! optional TOML file, initializes tracing, builds the Axum router and
//! starts the HTTP server.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intelliview::config::{AppConfig, DEFAULT_LOG_FILTER};
use intelliview::http::start_server;
use intelliview::{create_router, AppState};

/// IntelliView API: backend for the AI-powered interview platform
#[derive(Parser, Debug)]
#[command(name = "intelliview", version, about)]
struct Args {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "intelliview=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = AppConfig::load_or_default(args.config.as_ref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    match &args.config {
        Some(path) => tracing::info!(path = %path.display(), "Loaded configuration"),
        None => tracing::info!("Using built-in configuration defaults"),
    }

    let state = AppState::new(config.clone());
    let app = create_router(state)?;

    start_server(app, &config).await?;

    Ok(())
}
