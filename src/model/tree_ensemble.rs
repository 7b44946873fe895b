//! Gradient-boosted tree ensemble detector (inference only)
//!
//! Regression trees accumulated over log-odds: the attack probability is
//! `sigmoid(initial_log_odds + learning_rate * sum(tree outputs))`. The
//! ensemble requires an ordered feature-name list at construction time;
//! names bind matrix columns positionally, never by header matching,
//! because inference input is headerless.

use super::sigmoid;
use crate::error::{DetectorError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Row count above which per-row scoring fans out across rayon workers.
const PARALLEL_ROW_THRESHOLD: usize = 1024;

/// A node of one regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf with a log-odds contribution
    Leaf { value: f64 },
    /// Internal split: `feature <= threshold` goes left
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn evaluate(&self, row: &ArrayView1<f64>) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Split {
                feature_idx,
                threshold,
                left,
                right,
            } => {
                if row[*feature_idx] <= *threshold {
                    left.evaluate(row)
                } else {
                    right.evaluate(row)
                }
            }
        }
    }

    fn max_feature_idx(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature_idx,
                left,
                right,
                ..
            } => [left.max_feature_idx(), right.max_feature_idx()]
                .into_iter()
                .flatten()
                .chain(std::iter::once(*feature_idx))
                .max(),
        }
    }
}

/// Ensemble parameters as persisted in the model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EnsembleParams {
    trees: Vec<TreeNode>,
    learning_rate: f64,
    initial_log_odds: f64,
}

/// Pre-trained gradient-boosted detector.
#[derive(Debug, Clone)]
pub struct GradientBoostedTrees {
    params: EnsembleParams,
    feature_names: Vec<String>,
}

impl GradientBoostedTrees {
    /// Build an ensemble from explicit parts.
    ///
    /// `feature_names` defines the input width; every split index in every
    /// tree must address a feature inside that width.
    pub fn from_parameters(
        trees: Vec<TreeNode>,
        learning_rate: f64,
        initial_log_odds: f64,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        if feature_names.is_empty() {
            return Err(DetectorError::Artifact(
                "tree ensemble requires a non-empty feature-name list".to_string(),
            ));
        }
        if trees.is_empty() {
            return Err(DetectorError::Artifact(
                "tree ensemble artifact contains no trees".to_string(),
            ));
        }
        if !learning_rate.is_finite() || !initial_log_odds.is_finite() {
            return Err(DetectorError::Artifact(format!(
                "non-finite ensemble parameters: learning_rate={learning_rate}, \
                 initial_log_odds={initial_log_odds}"
            )));
        }
        for (idx, tree) in trees.iter().enumerate() {
            if let Some(max_idx) = tree.max_feature_idx() {
                if max_idx >= feature_names.len() {
                    return Err(DetectorError::Artifact(format!(
                        "tree {idx} splits on feature {max_idx} but only {} features are named",
                        feature_names.len()
                    )));
                }
            }
        }
        Ok(Self {
            params: EnsembleParams {
                trees,
                learning_rate,
                initial_log_odds,
            },
            feature_names,
        })
    }

    /// Load ensemble parameters and the ordered feature-name list from
    /// their JSON artifacts.
    pub fn load(model_path: impl AsRef<Path>, names_path: impl AsRef<Path>) -> Result<Self> {
        let model_path = model_path.as_ref();
        let file = std::fs::File::open(model_path).map_err(|e| {
            DetectorError::Artifact(format!(
                "cannot open model file {}: {e}",
                model_path.display()
            ))
        })?;
        let params: EnsembleParams = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| {
                DetectorError::Artifact(format!(
                    "cannot parse model file {}: {e}",
                    model_path.display()
                ))
            })?;

        let names_path = names_path.as_ref();
        let file = std::fs::File::open(names_path).map_err(|e| {
            DetectorError::Artifact(format!(
                "cannot open feature-name file {}: {e}",
                names_path.display()
            ))
        })?;
        let feature_names: Vec<String> = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| {
                DetectorError::Artifact(format!(
                    "cannot parse feature-name file {}: {e}",
                    names_path.display()
                ))
            })?;

        Self::from_parameters(
            params.trees,
            params.learning_rate,
            params.initial_log_odds,
            feature_names,
        )
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Ordered feature names bound to matrix columns by position.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Score a batch of normalized rows into attack probabilities.
    ///
    /// Large batches score rows in parallel; the per-row arithmetic is
    /// identical either way.
    pub fn score(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.feature_names.len() {
            return Err(DetectorError::Internal(format!(
                "ensemble trained on {} features scored against matrix of width {}",
                self.feature_names.len(),
                x.ncols()
            )));
        }

        let score_row = |row: ArrayView1<f64>| -> f64 {
            let log_odds = self.params.initial_log_odds
                + self.params.learning_rate
                    * self
                        .params
                        .trees
                        .iter()
                        .map(|tree| tree.evaluate(&row))
                        .sum::<f64>();
            sigmoid(log_odds)
        };

        let n_rows = x.nrows();
        let probs: Vec<f64> = if n_rows >= PARALLEL_ROW_THRESHOLD {
            (0..n_rows).into_par_iter().map(|i| score_row(x.row(i))).collect()
        } else {
            (0..n_rows).map(|i| score_row(x.row(i))).collect()
        };

        Ok(Array1::from_vec(probs))
    }
}
