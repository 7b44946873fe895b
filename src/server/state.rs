//! Application state management

use crate::config::DetectorConfig;
use crate::error::{DetectorError, Result};
use crate::inference::InferenceContext;
use std::sync::Arc;

/// State shared across handlers.
///
/// The inference context is built once at startup and never replaced;
/// `None` means startup has not completed (or a test deliberately runs the
/// router unloaded), and every prediction request is answered with 503.
pub struct AppState {
    pub config: DetectorConfig,
    pub started_at: chrono::DateTime<chrono::Utc>,
    context: Option<Arc<InferenceContext>>,
}

impl AppState {
    /// State without a loaded context; predictions will be unavailable.
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            started_at: chrono::Utc::now(),
            context: None,
        }
    }

    /// State with a fully loaded inference context.
    pub fn with_context(config: DetectorConfig, context: InferenceContext) -> Self {
        Self {
            config,
            started_at: chrono::Utc::now(),
            context: Some(Arc::new(context)),
        }
    }

    /// Availability gate: the loaded context, or `ServiceUnavailable`.
    pub fn context(&self) -> Result<&Arc<InferenceContext>> {
        self.context.as_ref().ok_or(DetectorError::ServiceUnavailable)
    }

    /// Context if loaded, for status reporting.
    pub fn context_opt(&self) -> Option<&Arc<InferenceContext>> {
        self.context.as_ref()
    }

    /// Host CPU/memory snapshot for the ops status endpoint.
    pub fn get_system_info(&self) -> serde_json::Value {
        use sysinfo::System;

        let mut sys = System::new_all();
        sys.refresh_all();

        let cpu_usage: f32 =
            sys.cpus().iter().map(|c| c.cpu_usage()).sum::<f32>() / sys.cpus().len().max(1) as f32;

        serde_json::json!({
            "cpu_count": sys.cpus().len(),
            "cpu_usage": cpu_usage,
            "total_memory_gb": sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0,
            "used_memory_gb": sys.used_memory() as f64 / 1024.0 / 1024.0 / 1024.0,
        })
    }
}
