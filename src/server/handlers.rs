//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::error::DetectorError;
use crate::inference::Prediction;

use super::error::Result;
use super::state::AppState;

/// Single-prediction request body.
///
/// A non-numeric element in `features` is rejected by the JSON boundary
/// itself (422) before this type is ever constructed.
#[derive(Debug, Deserialize)]
pub struct NetworkFeaturesInput {
    pub features: Vec<f64>,
}

// ============================================================================
// Prediction Handlers
// ============================================================================

/// Classify one feature vector.
pub async fn predict_single(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NetworkFeaturesInput>,
) -> Result<Json<Prediction>> {
    let context = state.context()?;
    info!(
        num_features = input.features.len(),
        "Received single prediction request"
    );

    let prediction = context.predict_one(&input.features)?;

    info!(
        status = %prediction.status,
        probability_attack = prediction.probability_attack,
        "Single prediction successful"
    );
    Ok(Json(prediction))
}

/// Classify every row of an uploaded headerless CSV file.
pub async fn predict_batch(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<Prediction>>> {
    // Availability gate runs before the body is consumed.
    let context = Arc::clone(state.context()?);

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        DetectorError::MalformedTable(format!("Invalid multipart payload: {e}."))
    })? {
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let data = field.bytes().await.map_err(|e| {
            DetectorError::MalformedTable(format!("Failed to read uploaded file: {e}."))
        })?;

        info!(
            filename = %file_name,
            bytes = data.len(),
            "Received batch prediction request"
        );

        // The pipeline is synchronous and CPU-bound; keep it off the
        // cooperative I/O workers.
        let task_context = Arc::clone(&context);
        let predictions = tokio::task::spawn_blocking(move || {
            task_context.predict_csv(&file_name, &data)
        })
        .await
        .map_err(|e| DetectorError::Internal(format!("prediction task failed: {e}")))??;

        info!(count = predictions.len(), "Batch prediction successful");
        return Ok(Json(predictions));
    }

    Err(DetectorError::MalformedTable(
        "No file field found in multipart upload.".to_string(),
    )
    .into())
}

// ============================================================================
// Service Handlers
// ============================================================================

pub async fn read_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "N-BaIoT Botnet Detector API. See /health for service status.",
    }))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let model = state.context_opt().map(|context| {
        serde_json::json!({
            "backend": context.backend().as_str(),
            "expected_features": context.n_features(),
        })
    });

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model_loaded": model.is_some(),
        "model": model,
    }))
}

pub async fn get_system_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "system": state.get_system_info(),
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": chrono::Utc::now()
            .signed_duration_since(state.started_at)
            .num_seconds(),
        "model_loaded": state.context_opt().is_some(),
    }))
}
