//! Immutable inference context shared across request handlers

use crate::config::DetectorConfig;
use crate::error::{DetectorError, Result};
use crate::features::FeatureMatrix;
use crate::model::{
    AttackClassifier, BackendKind, GradientBoostedTrees, MlpDetector, ATTACK_THRESHOLD,
};
use crate::preprocessing::RobustScaler;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One labeled classification result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction_label: u8,
    pub status: String,
    pub probability_attack: f64,
}

impl Prediction {
    /// Apply the shared decision threshold. A probability of exactly 0.5
    /// classifies as Benign.
    pub fn from_probability(probability_attack: f64) -> Self {
        let prediction_label = u8::from(probability_attack > ATTACK_THRESHOLD);
        let status = if prediction_label == 1 {
            "Attack"
        } else {
            "Benign"
        };
        Self {
            prediction_label,
            status: status.to_string(),
            probability_attack,
        }
    }
}

/// The loaded scaler and classifier, constructed once at startup and shared
/// read-only (via `Arc`) into every request handler. Never mutated after
/// construction, so no locking is required.
#[derive(Debug, Clone)]
pub struct InferenceContext {
    scaler: RobustScaler,
    classifier: AttackClassifier,
    n_features: usize,
}

impl InferenceContext {
    /// Bind a scaler and classifier, cross-checking that they agree on the
    /// feature width. A mismatch means the artifacts were trained
    /// separately and is fatal.
    pub fn new(scaler: RobustScaler, classifier: AttackClassifier) -> Result<Self> {
        let n_features = scaler.n_features();
        if classifier.n_features() != n_features {
            return Err(DetectorError::Artifact(format!(
                "scaler expects {} features but the {} model expects {}",
                n_features,
                classifier.kind().as_str(),
                classifier.n_features()
            )));
        }
        Ok(Self {
            scaler,
            classifier,
            n_features,
        })
    }

    /// Load all artifacts named by the configuration. Any missing or
    /// corrupt artifact aborts startup; there is no degraded mode.
    pub fn load(config: &DetectorConfig) -> Result<Self> {
        info!(scaler_path = %config.scaler_path, "Loading scaler parameters");
        let scaler = RobustScaler::load(&config.scaler_path)?;

        info!(
            model_path = %config.model_path,
            backend = config.backend.as_str(),
            "Loading classifier model"
        );
        let classifier = match config.backend {
            BackendKind::NeuralNetwork => {
                AttackClassifier::NeuralNetwork(MlpDetector::load(&config.model_path)?)
            }
            BackendKind::TreeEnsemble => AttackClassifier::TreeEnsemble(
                GradientBoostedTrees::load(&config.model_path, &config.feature_names_path)?,
            ),
        };

        let context = Self::new(scaler, classifier)?;
        info!(
            expected_features = context.n_features,
            backend = context.backend().as_str(),
            "Inference context ready"
        );
        Ok(context)
    }

    /// Width every incoming feature vector and table must match.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn backend(&self) -> BackendKind {
        self.classifier.kind()
    }

    /// Classify one raw feature vector.
    pub fn predict_one(&self, features: &[f64]) -> Result<Prediction> {
        let matrix = FeatureMatrix::from_vector(features, self.n_features)?;
        let mut predictions = self.run(matrix)?;
        predictions
            .pop()
            .ok_or_else(|| DetectorError::Internal("pipeline returned no prediction".to_string()))
    }

    /// Classify every row of an uploaded CSV payload.
    ///
    /// All-or-nothing: either every row receives a prediction, in input
    /// order, or the whole request fails with one error.
    pub fn predict_csv(&self, filename: &str, bytes: &[u8]) -> Result<Vec<Prediction>> {
        if !filename.to_ascii_lowercase().ends_with(".csv") {
            return Err(DetectorError::UnsupportedMediaType(filename.to_string()));
        }
        let matrix = FeatureMatrix::from_csv(bytes, self.n_features)?;
        debug!(
            rows = matrix.n_rows(),
            columns = matrix.n_features(),
            "Parsed batch CSV payload"
        );
        self.run(matrix)
    }

    /// Scale, score, and label a validated matrix. Single requests travel
    /// through here as one-row matrices; there is no special-casing by
    /// call site.
    fn run(&self, matrix: FeatureMatrix) -> Result<Vec<Prediction>> {
        let scaled = self.scaler.transform(matrix.as_array())?;
        let probabilities = self.classifier.score(&scaled)?;
        Ok(probabilities
            .iter()
            .map(|&p| Prediction::from_probability(p))
            .collect())
    }
}
