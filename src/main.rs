//! N-BaIoT Botnet Detector - Main Entry Point

use anyhow::Context;
use clap::Parser;
use nbiot_detector::config::DetectorConfig;
use nbiot_detector::model::BackendKind;
use nbiot_detector::server::run_server;

#[derive(Parser)]
#[command(
    name = "nbiot-detector",
    version,
    about = "HTTP inference service detecting botnet attacks in IoT network traffic"
)]
struct Cli {
    /// Bind address (overrides API_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides API_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Classifier backend: 'mlp' or 'trees' (overrides MODEL_BACKEND)
    #[arg(long)]
    backend: Option<String>,

    /// Model artifact path (overrides MODEL_PATH)
    #[arg(long)]
    model: Option<String>,

    /// Scaler artifact path (overrides SCALER_PATH)
    #[arg(long)]
    scaler: Option<String>,

    /// Feature-name list path, tree backend only (overrides FEATURE_NAMES_PATH)
    #[arg(long)]
    feature_names: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nbiot_detector=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = DetectorConfig::default();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(backend) = cli.backend {
        config.backend = backend
            .parse::<BackendKind>()
            .map_err(|e| anyhow::anyhow!(e))
            .context("invalid --backend value")?;
    }
    if let Some(model) = cli.model {
        config.model_path = model;
    }
    if let Some(scaler) = cli.scaler {
        config.scaler_path = scaler;
    }
    if let Some(feature_names) = cli.feature_names {
        config.feature_names_path = feature_names;
    }

    run_server(config).await
}
