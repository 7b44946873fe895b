//! Error types for the N-BaIoT detector service

use thiserror::Error;

/// Result type alias for detector operations
pub type Result<T> = std::result::Result<T, DetectorError>;

/// Main error type for the detector pipeline.
///
/// Every validation failure maps to exactly one variant, detected at the
/// earliest stage that can observe it. Variants carrying a `String` hold the
/// full caller-facing message, built where the failure is detected.
#[derive(Error, Debug)]
pub enum DetectorError {
    /// A feature vector or parsed table does not have the configured width.
    #[error("Expected {expected} features, got {actual}")]
    InvalidFeatureCount { expected: usize, actual: usize },

    /// A structurally present value cannot be coerced to a finite number.
    #[error("{0}")]
    NonNumericInput(String),

    /// The uploaded file does not declare a CSV payload.
    #[error("Invalid file type '{0}'. Please upload a CSV file.")]
    UnsupportedMediaType(String),

    /// The uploaded payload parsed to zero rows.
    #[error("CSV file is empty or contains no data rows.")]
    EmptyPayload,

    /// The payload cannot be parsed as a rectangular table.
    #[error("{0}")]
    MalformedTable(String),

    /// The inference context is not loaded (startup incomplete or failed).
    #[error("Model or scaler not loaded. Server might be starting or encountered an error.")]
    ServiceUnavailable,

    /// A persisted scaler/model artifact is missing, corrupt, or inconsistent.
    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catch-all for failures not anticipated by the explicit taxonomy.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DetectorError {
    /// True for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DetectorError::InvalidFeatureCount { .. }
                | DetectorError::NonNumericInput(_)
                | DetectorError::UnsupportedMediaType(_)
                | DetectorError::EmptyPayload
                | DetectorError::MalformedTable(_)
        )
    }
}
