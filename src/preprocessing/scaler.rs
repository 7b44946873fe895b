//! Robust feature scaling

use crate::error::{DetectorError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters for one feature position
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    /// Per-feature median from the training distribution
    center: f64,
    /// Per-feature interquartile range; never zero in a valid artifact
    scale: f64,
}

/// Robust scaler: `(x - median) / IQR` per feature position.
///
/// Parameters are positional because inference input is headerless; the
/// i-th pair applies to the i-th column. Immutable after load and shared
/// read-only across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobustScaler {
    params: Vec<ScalerParams>,
}

impl RobustScaler {
    /// Build a scaler from parallel center/scale vectors.
    pub fn from_parameters(centers: Vec<f64>, scales: Vec<f64>) -> Result<Self> {
        if centers.is_empty() {
            return Err(DetectorError::Artifact(
                "scaler has no feature parameters".to_string(),
            ));
        }
        if centers.len() != scales.len() {
            return Err(DetectorError::Artifact(format!(
                "scaler center/scale length mismatch: {} vs {}",
                centers.len(),
                scales.len()
            )));
        }
        let params = centers
            .into_iter()
            .zip(scales)
            .enumerate()
            .map(|(idx, (center, scale))| {
                if !center.is_finite() || !scale.is_finite() || scale == 0.0 {
                    return Err(DetectorError::Artifact(format!(
                        "invalid scaler parameters at feature {idx}: center={center}, scale={scale}"
                    )));
                }
                Ok(ScalerParams { center, scale })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { params })
    }

    /// Load fitted parameters from a JSON artifact.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            DetectorError::Artifact(format!("cannot open scaler file {}: {e}", path.display()))
        })?;
        let scaler: RobustScaler = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| {
                DetectorError::Artifact(format!("cannot parse scaler file {}: {e}", path.display()))
            })?;
        // Re-run construction checks so a hand-edited artifact cannot smuggle
        // in zero or non-finite scales.
        let (centers, scales): (Vec<f64>, Vec<f64>) =
            scaler.params.iter().map(|p| (p.center, p.scale)).unzip();
        Self::from_parameters(centers, scales)
    }

    /// Number of feature positions this scaler was fitted on.
    pub fn n_features(&self) -> usize {
        self.params.len()
    }

    /// Apply the transform to every row of a matrix.
    ///
    /// Identical for a one-row matrix and a large batch; there is no
    /// batch-specific renormalization. A width mismatch here means the
    /// validation stage was bypassed, which is a programming error rather
    /// than caller input.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.params.len() {
            return Err(DetectorError::Internal(format!(
                "scaler fitted on {} features applied to matrix of width {}",
                self.params.len(),
                x.ncols()
            )));
        }
        let mut scaled = x.clone();
        for (col_idx, params) in self.params.iter().enumerate() {
            for value in scaled.column_mut(col_idx).iter_mut() {
                *value = (*value - params.center) / params.scale;
            }
        }
        Ok(scaled)
    }
}
