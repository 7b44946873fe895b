//! Pre-trained classifier backends
//!
//! Two interchangeable backends score normalized feature matrices into
//! per-row attack probabilities: a multi-layer perceptron and a
//! gradient-boosted tree ensemble. Both are loaded once at startup from
//! persisted artifacts and never mutated afterwards.

mod mlp;
mod tree_ensemble;

pub use mlp::{MlpConfig, MlpDetector};
pub use tree_ensemble::{GradientBoostedTrees, TreeNode};

use crate::error::Result;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Decision threshold shared by every backend.
///
/// `label = 1` iff the attack probability strictly exceeds this value; a
/// probability of exactly 0.5 is classified Benign.
pub const ATTACK_THRESHOLD: f64 = 0.5;

pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Which classifier backend the service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    NeuralNetwork,
    TreeEnsemble,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::NeuralNetwork => "neural_network",
            BackendKind::TreeEnsemble => "tree_ensemble",
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mlp" | "neural_network" | "neural-network" => Ok(BackendKind::NeuralNetwork),
            "trees" | "gbdt" | "tree_ensemble" | "tree-ensemble" => Ok(BackendKind::TreeEnsemble),
            other => Err(format!(
                "unknown model backend '{other}' (expected 'mlp' or 'trees')"
            )),
        }
    }
}

/// A loaded classifier, one of the two supported backends.
///
/// The scoring contract is identical across variants: one probability in
/// [0, 1] per input row, deterministic for fixed input and fixed loaded
/// parameters. A batch of size one and a single instance take the same
/// code path.
#[derive(Debug, Clone)]
pub enum AttackClassifier {
    NeuralNetwork(MlpDetector),
    TreeEnsemble(GradientBoostedTrees),
}

impl AttackClassifier {
    /// Score a matrix of normalized feature rows into attack probabilities.
    pub fn score(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            AttackClassifier::NeuralNetwork(model) => model.score(x),
            AttackClassifier::TreeEnsemble(model) => model.score(x),
        }
    }

    /// Input width the classifier was trained on.
    pub fn n_features(&self) -> usize {
        match self {
            AttackClassifier::NeuralNetwork(model) => model.n_features(),
            AttackClassifier::TreeEnsemble(model) => model.n_features(),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            AttackClassifier::NeuralNetwork(_) => BackendKind::NeuralNetwork,
            AttackClassifier::TreeEnsemble(_) => BackendKind::TreeEnsemble,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_range() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(50.0) > 0.999);
        assert!(sigmoid(-50.0) < 0.001);
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("mlp".parse::<BackendKind>(), Ok(BackendKind::NeuralNetwork));
        assert_eq!("trees".parse::<BackendKind>(), Ok(BackendKind::TreeEnsemble));
        assert_eq!(
            "Tree-Ensemble".parse::<BackendKind>(),
            Ok(BackendKind::TreeEnsemble)
        );
        assert!("svm".parse::<BackendKind>().is_err());
    }
}
