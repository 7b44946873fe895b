//! Feature vector and matrix types
//!
//! The atomic unit of input is a fixed-width row of finite `f64` values.
//! Batches arrive as headerless CSV bytes and are validated in stages:
//! structural parse, shape, then cell-level numeric coercion. Scaling and
//! scoring never see a partially valid batch.

use crate::error::{DetectorError, Result};
use ndarray::Array2;
use polars::prelude::*;
use std::io::Cursor;

/// A validated batch of feature vectors, one row per instance.
///
/// Row order is preserved end-to-end: output row `i` always corresponds to
/// input row `i`. A single instance is represented as a one-row matrix so
/// that the scaling and scoring code paths are identical for both shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Array2<f64>,
}

impl FeatureMatrix {
    /// Validate a single raw feature vector and wrap it as a one-row matrix.
    pub fn from_vector(features: &[f64], expected: usize) -> Result<Self> {
        if features.len() != expected {
            return Err(DetectorError::InvalidFeatureCount {
                expected,
                actual: features.len(),
            });
        }
        for (idx, value) in features.iter().enumerate() {
            if !value.is_finite() {
                return Err(DetectorError::NonNumericInput(format!(
                    "Feature at position {idx} is not a finite number."
                )));
            }
        }
        let data = Array2::from_shape_vec((1, expected), features.to_vec())
            .map_err(|e| DetectorError::Internal(format!("feature vector reshape failed: {e}")))?;
        Ok(Self { data })
    }

    /// Parse a headerless CSV byte buffer into a validated matrix.
    ///
    /// Validation is staged so each failure is reported at the earliest
    /// stage that can observe it: empty payload, structural parse, column
    /// count, then per-cell numeric coercion.
    pub fn from_csv(bytes: &[u8], expected: usize) -> Result<Self> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(DetectorError::EmptyPayload);
        }

        // Read every column as a string; numeric coercion is a separate
        // stage with its own error kind.
        let df = CsvReadOptions::default()
            .with_has_header(false)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
            .map_err(|e| {
                DetectorError::MalformedTable(format!(
                    "Error parsing CSV file. Ensure it is valid CSV with no header row ({e})."
                ))
            })?;

        if df.height() == 0 {
            return Err(DetectorError::EmptyPayload);
        }
        if df.width() != expected {
            return Err(DetectorError::InvalidFeatureCount {
                expected,
                actual: df.width(),
            });
        }

        let n_rows = df.height();
        let n_cols = df.width();
        let mut data = vec![0.0f64; n_rows * n_cols];

        for (col_idx, column) in df.get_columns().iter().enumerate() {
            let ca = column.str().map_err(|e| {
                DetectorError::MalformedTable(format!(
                    "Error parsing CSV file: unexpected column content ({e})."
                ))
            })?;
            for (row_idx, cell) in ca.into_iter().enumerate() {
                let value = coerce_cell(cell, row_idx, col_idx)?;
                data[row_idx * n_cols + col_idx] = value;
            }
        }

        let data = Array2::from_shape_vec((n_rows, n_cols), data)
            .map_err(|e| DetectorError::Internal(format!("feature matrix reshape failed: {e}")))?;
        Ok(Self { data })
    }

    /// Number of rows (instances) in the batch.
    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of features per row.
    pub fn n_features(&self) -> usize {
        self.data.ncols()
    }

    /// Borrow the underlying row-major array.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }
}

fn coerce_cell(cell: Option<&str>, row_idx: usize, col_idx: usize) -> Result<f64> {
    let text = cell.ok_or_else(|| {
        DetectorError::NonNumericInput(format!(
            "CSV contains non-numeric data where numbers are expected \
             (missing value at row {row_idx}, column {col_idx})."
        ))
    })?;
    let value: f64 = text.trim().parse().map_err(|_| {
        DetectorError::NonNumericInput(format!(
            "CSV contains non-numeric data where numbers are expected \
             ('{text}' at row {row_idx}, column {col_idx})."
        ))
    })?;
    if !value.is_finite() {
        return Err(DetectorError::NonNumericInput(format!(
            "CSV contains non-numeric data where numbers are expected \
             (non-finite value '{text}' at row {row_idx}, column {col_idx})."
        )));
    }
    Ok(value)
}
