//! Multi-layer perceptron detector (inference only)
//!
//! A dense feed-forward network with two hidden layers and ReLU
//! activations, matching the offline training architecture. Dropout is a
//! training-time regularizer: the forward pass here always runs in
//! evaluation mode and never masks activations, so scoring is
//! deterministic for fixed input and weights.

use super::sigmoid;
use crate::error::{DetectorError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Network architecture, recorded alongside the weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpConfig {
    pub input_size: usize,
    pub hidden_size_1: usize,
    pub hidden_size_2: usize,
    pub output_size: usize,
    /// Dropout rate used during offline training. Kept for provenance only;
    /// it has no effect on scoring.
    pub dropout_rate: f64,
}

/// Pre-trained MLP detector: input -> hidden1 -> hidden2 -> logit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpDetector {
    config: MlpConfig,
    /// One weight matrix per layer, each `n_in x n_out`
    weights: Vec<Array2<f64>>,
    /// One bias vector per layer
    biases: Vec<Array1<f64>>,
}

impl MlpDetector {
    /// Build a detector from explicit parameters, validating layer shapes.
    pub fn from_parameters(
        config: MlpConfig,
        weights: Vec<Array2<f64>>,
        biases: Vec<Array1<f64>>,
    ) -> Result<Self> {
        let expected_shapes = [
            (config.input_size, config.hidden_size_1),
            (config.hidden_size_1, config.hidden_size_2),
            (config.hidden_size_2, config.output_size),
        ];
        if config.output_size != 1 {
            return Err(DetectorError::Artifact(format!(
                "binary detector requires a single output unit, got {}",
                config.output_size
            )));
        }
        if weights.len() != expected_shapes.len() || biases.len() != expected_shapes.len() {
            return Err(DetectorError::Artifact(format!(
                "expected {} layers, got {} weight matrices and {} bias vectors",
                expected_shapes.len(),
                weights.len(),
                biases.len()
            )));
        }
        for (idx, ((w, b), (n_in, n_out))) in
            weights.iter().zip(&biases).zip(expected_shapes).enumerate()
        {
            if w.nrows() != n_in || w.ncols() != n_out {
                return Err(DetectorError::Artifact(format!(
                    "layer {idx} weight shape {}x{} does not match architecture {n_in}x{n_out}",
                    w.nrows(),
                    w.ncols()
                )));
            }
            if b.len() != n_out {
                return Err(DetectorError::Artifact(format!(
                    "layer {idx} bias length {} does not match architecture width {n_out}",
                    b.len()
                )));
            }
        }
        Ok(Self {
            config,
            weights,
            biases,
        })
    }

    /// Load weights from a JSON artifact.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            DetectorError::Artifact(format!("cannot open model file {}: {e}", path.display()))
        })?;
        let model: MlpDetector = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| {
                DetectorError::Artifact(format!("cannot parse model file {}: {e}", path.display()))
            })?;
        // Re-validate shapes against the recorded architecture.
        Self::from_parameters(model.config, model.weights, model.biases)
    }

    pub fn n_features(&self) -> usize {
        self.config.input_size
    }

    pub fn config(&self) -> &MlpConfig {
        &self.config
    }

    /// Score a batch of normalized rows into attack probabilities.
    ///
    /// `sigmoid(logit)` per row; evaluation mode, no stochastic behavior.
    pub fn score(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.config.input_size {
            return Err(DetectorError::Internal(format!(
                "network trained on {} features scored against matrix of width {}",
                self.config.input_size,
                x.ncols()
            )));
        }

        let mut activation = x.clone();
        let last = self.weights.len() - 1;
        for (idx, (w, b)) in self.weights.iter().zip(&self.biases).enumerate() {
            let z = activation.dot(w) + b;
            activation = if idx < last {
                z.mapv(|v| v.max(0.0))
            } else {
                z
            };
        }

        Ok(activation.column(0).mapv(sigmoid))
    }
}
