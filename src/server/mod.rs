//! HTTP server for the N-BaIoT botnet detector
//!
//! Thin glue binding the inference pipeline to axum routes. Artifacts are
//! loaded before the listener is bound: a missing or corrupt artifact
//! aborts startup rather than serving degraded.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ApiError;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::config::DetectorConfig;
use crate::inference::InferenceContext;

/// Load all artifacts and serve until ctrl-c.
pub async fn run_server(config: DetectorConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    info!(
        backend = config.backend.as_str(),
        started_at = %start_time.to_rfc3339(),
        "Initializing N-BaIoT detector service"
    );

    // Fail fast: the process must not accept traffic without its assets.
    let context = InferenceContext::load(&config)?;

    let state = Arc::new(AppState::with_context(config.clone(), context));
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        pid = std::process::id(),
        max_upload_size_mb = config.max_upload_size / 1024 / 1024,
        "Server listening and ready to accept connections"
    );

    let shutdown_signal = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        let stop_time = chrono::Utc::now();
        let uptime = stop_time.signed_duration_since(start_time);
        info!(
            stopped_at = %stop_time.to_rfc3339(),
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
