//! Service configuration
//!
//! Every knob reads an environment variable with a sensible default, and
//! the CLI in `main` can override individual fields.

use crate::model::BackendKind;

/// Full service configuration: bind address, upload limits, and the
/// persisted-artifact locations.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub host: String,
    pub port: u16,
    /// Which classifier backend to load at startup
    pub backend: BackendKind,
    /// Model parameters artifact (JSON)
    pub model_path: String,
    /// Fitted scaler parameters artifact (JSON)
    pub scaler_path: String,
    /// Ordered feature-name list, required by the tree-ensemble backend
    pub feature_names_path: String,
    /// Maximum accepted request body size in bytes
    pub max_upload_size: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            backend: std::env::var("MODEL_BACKEND")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(BackendKind::NeuralNetwork),
            model_path: std::env::var("MODEL_PATH")
                .unwrap_or_else(|_| "saved_assets/best_nbiot_detector.json".to_string()),
            scaler_path: std::env::var("SCALER_PATH")
                .unwrap_or_else(|_| "saved_assets/nbiot_multi_device_scaler.json".to_string()),
            feature_names_path: std::env::var("FEATURE_NAMES_PATH")
                .unwrap_or_else(|_| "saved_assets/nbiot_feature_names.json".to_string()),
            max_upload_size: std::env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50 * 1024 * 1024), // 50MB
        }
    }
}
